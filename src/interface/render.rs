use crate::kitchen::Kitchen;
use crate::models::{ActorId, Item, Recipe, Station};
use crate::state::{GameEvent, GameSession, GameState, RecipeBook, Score};

/// Display the active menu in a formatted table.
pub fn display_menu(book: &RecipeBook) {
    let active = book.active_recipes();
    if active.is_empty() {
        println!("The menu is empty. Orders will arrive shortly.");
        return;
    }

    println!();
    println!("=== Orders ({}/{}) ===", active.len(), book.config().max_menu_size);
    display_recipe_rows(&active);
    println!();
}

/// Display every recipe in the catalog.
pub fn display_catalog(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("Recipe catalog: (none)");
        return;
    }

    println!();
    println!("=== Recipe Catalog ({} recipes) ===", recipes.len());
    let rows: Vec<&Recipe> = recipes.iter().collect();
    display_recipe_rows(&rows);
    println!();
}

fn display_recipe_rows(recipes: &[&Recipe]) {
    let max_name_len = recipes.iter().map(|r| r.name.len()).max().unwrap_or(10);

    for (i, recipe) in recipes.iter().enumerate() {
        let ingredients: Vec<String> = recipe.ingredients.iter().map(|i| i.to_string()).collect();
        println!(
            "{:>3}. {:<width$} - {:>3} coins | {}",
            i + 1,
            recipe.name,
            recipe.price,
            ingredients.join(", "),
            width = max_name_len
        );
    }
}

/// Display one recipe with its description.
pub fn display_recipe(recipe: &Recipe) {
    println!();
    println!("=== {} ({} coins) ===", recipe.name, recipe.price);
    println!("{}", recipe.full_description());
}

/// Display every station and what it holds, plus the players' hands.
pub fn display_kitchen(kitchen: &Kitchen) {
    println!();
    println!("=== Kitchen ===");

    let max_name_len = kitchen
        .containers()
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(10);

    for container in kitchen.containers() {
        let contents = match &container.station {
            Station::Supply { food } => format!("hands out {}", food),
            Station::PlateDispenser(dispenser) => {
                format!("{}/{} plates", dispenser.count(), dispenser.capacity)
            }
            _ => match container.held().and_then(|id| kitchen.item(id)) {
                Some(item) => describe_progress(item),
                None => "-".to_string(),
            },
        };
        let flag = if container.is_active_stove() { " [on]" } else { "" };
        println!(
            "{:>3}. {:<width$} {}{}",
            container.id.0,
            container.name,
            contents,
            flag,
            width = max_name_len
        );
    }

    for actor in 0..kitchen.actor_count() {
        let actor = ActorId(actor as u32);
        let held = kitchen
            .held_by(actor)
            .and_then(|id| kitchen.item(id))
            .map(|item| item.label())
            .unwrap_or_else(|| "empty hands".to_string());
        println!("Player {}: {}", actor.0 + 1, held);
    }
    println!();
}

fn describe_progress(item: &Item) -> String {
    if item.can_be_cut() && item.cutting_progress() > 0.0 {
        format!("{} (cut {:.0}%)", item.label(), item.cutting_progress() * 100.0)
    } else if item.can_be_cooked() && item.cooking_progress() > 0.0 {
        format!("{} (cooked {:.0}%)", item.label(), item.cooking_progress() * 100.0)
    } else {
        item.label()
    }
}

/// Display the clock and score line.
pub fn display_status(session: &GameSession) {
    let score = session.score();
    match session.state() {
        GameState::Countdown => println!("Starting in {:.0}...", session.countdown_secs().ceil()),
        GameState::Paused => println!("-- Paused --"),
        _ => println!(
            "Time left: {:>5.1}s | Delivered: {} | Coins: {}",
            session.remaining_secs(),
            score.delivered,
            score.total
        ),
    }
}

/// One-line text for events a player cares about; `None` for noise.
pub fn describe_event(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::CuttingCompleted { result, .. } => Some(format!("Cut into {}.", result)),
        GameEvent::CookingCompleted { result, .. } => Some(format!("The stove made {}.", result)),
        GameEvent::RecipeSuccess { recipe, price } => {
            Some(format!("Delivered {}! +{} coins", recipe.name, price))
        }
        GameEvent::RecipeFailed { ingredients } => {
            let names: Vec<String> = ingredients.iter().map(|i| i.to_string()).collect();
            Some(format!("Nobody ordered [{}].", names.join(", ")))
        }
        GameEvent::ItemTrashed { .. } => Some("Binned.".to_string()),
        GameEvent::GameStateChanged { state } => match state {
            GameState::Playing => Some("Go!".to_string()),
            GameState::GameOver => Some("Time's up!".to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Print the interesting events of a drain.
pub fn display_events(events: &[GameEvent]) {
    for line in events.iter().filter_map(describe_event) {
        println!("  > {}", line);
    }
}

/// Display the end-of-round summary.
pub fn display_game_over(score: Score) {
    println!();
    println!("--- Round Over ---");
    println!("Recipes delivered: {}", score.delivered);
    println!("Coins earned: {}", score.total);
    println!();
}
