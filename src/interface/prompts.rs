use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{KitchenError, Result};
use crate::kitchen::{Kitchen, Target};
use crate::models::{ContainerId, Recipe, StationKind};

/// Fuzzy score above which a recipe name counts as a candidate.
const MATCH_THRESHOLD: f64 = 0.7;

/// What a player chose to do with their turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    Interact(Target),
    Cut(Target),
    Drop,
    Wait(f64),
    Pause,
    Quit,
}

/// Prompt for the next action.
pub fn prompt_action(kitchen: &Kitchen) -> Result<PlayerAction> {
    let options = [
        "Use a station",
        "Cut",
        "Drop held item",
        "Wait",
        "Pause",
        "Quit",
    ];

    let selection = Select::new()
        .with_prompt("What next?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => PlayerAction::Interact(Target::Container(prompt_station(kitchen, None)?)),
        1 => PlayerAction::Cut(Target::Container(prompt_station(
            kitchen,
            Some(StationKind::CuttingBoard),
        )?)),
        2 => PlayerAction::Drop,
        3 => PlayerAction::Wait(prompt_wait_secs()?),
        4 => PlayerAction::Pause,
        _ => PlayerAction::Quit,
    })
}

/// Prompt for a station, optionally only those of one kind.
pub fn prompt_station(kitchen: &Kitchen, kind: Option<StationKind>) -> Result<ContainerId> {
    let stations: Vec<(ContainerId, String)> = kitchen
        .containers()
        .iter()
        .filter(|c| kind.is_none_or(|k| c.kind() == k))
        .map(|c| (c.id, c.name.clone()))
        .collect();

    match stations.len() {
        0 => Err(KitchenError::InvalidInput(
            "No matching station in this kitchen".to_string(),
        )),
        1 => Ok(stations[0].0),
        _ => {
            let names: Vec<&str> = stations.iter().map(|(_, name)| name.as_str()).collect();
            let selection = Select::new()
                .with_prompt("Which station?")
                .items(&names)
                .default(0)
                .interact()?;
            Ok(stations[selection].0)
        }
    }
}

/// Prompt for how long to wait.
pub fn prompt_wait_secs() -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Wait how many seconds?")
        .default("1".to_string())
        .interact_text()?;

    let secs: f64 = input
        .trim()
        .parse()
        .map_err(|_| KitchenError::InvalidInput("Invalid number".to_string()))?;

    if !(secs > 0.0) {
        return Err(KitchenError::InvalidInput(
            "Wait time must be positive".to_string(),
        ));
    }
    Ok(secs)
}

/// Recipes whose name or id resembles `query`, best first.
///
/// An exact (case-insensitive) name or id match is returned alone.
pub fn find_recipes<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let query = query.trim().to_lowercase();

    if let Some(exact) = recipes
        .iter()
        .find(|r| r.name.to_lowercase() == query || r.id == query)
    {
        return vec![exact];
    }

    let mut candidates: Vec<(&Recipe, f64)> = recipes
        .iter()
        .map(|r| {
            let by_name = jaro_winkler(&r.name.to_lowercase(), &query);
            let by_id = jaro_winkler(&r.id, &query);
            (r, by_name.max(by_id))
        })
        .filter(|(_, score)| *score > MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.into_iter().map(|(r, _)| r).collect()
}

/// Look up a recipe by fuzzy name, asking the user to settle ties.
pub fn prompt_recipe<'a>(recipes: &'a [Recipe], query: &str) -> Result<Option<&'a Recipe>> {
    let candidates = find_recipes(recipes, query);

    match candidates.len() {
        0 => Err(KitchenError::RecipeNotFound(query.trim().to_string())),
        1 => {
            let recipe = candidates[0];
            if recipe.name.eq_ignore_ascii_case(query.trim()) || recipe.id == query.trim() {
                return Ok(Some(recipe));
            }
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", recipe.name))
                .default(true)
                .interact()?;
            Ok(confirm.then_some(recipe))
        }
        _ => {
            let options: Vec<String> = candidates.iter().take(5).map(|r| r.name.clone()).collect();

            let mut selection_options = options.clone();
            selection_options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&selection_options)
                .default(0)
                .interact()?;

            Ok(candidates.get(selection).copied().filter(|_| selection < options.len()))
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::standard_recipes;

    #[test]
    fn test_find_recipes_exact_name() {
        let recipes = standard_recipes();
        let found = find_recipes(&recipes, "roast meat sandwich");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "meat-sandwich");
    }

    #[test]
    fn test_find_recipes_by_id() {
        let recipes = standard_recipes();
        let found = find_recipes(&recipes, "cheese-sandwich");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Classic Cheese Sandwich");
    }

    #[test]
    fn test_find_recipes_fuzzy() {
        let recipes = standard_recipes();
        let found = find_recipes(&recipes, "Classic Chese Sandwich");
        assert!(!found.is_empty());
        assert_eq!(found[0].id, "cheese-sandwich");
    }

    #[test]
    fn test_find_recipes_no_match() {
        let recipes = standard_recipes();
        assert!(find_recipes(&recipes, "zzzzqqq").is_empty());
    }
}
