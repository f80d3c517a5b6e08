use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{Recipe, validate_recipes};
use crate::state::SessionConfig;

/// Load a session config from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SessionConfig> {
    let content = fs::read_to_string(path)?;
    let config: SessionConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save a session config as pretty-printed JSON.
pub fn save_config<P: AsRef<Path>>(path: P, config: &SessionConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a recipe catalog from a JSON file.
///
/// Deduplicates by id (last occurrence wins, keeping the first position).
pub fn load_recipes<P: AsRef<Path>>(path: P) -> Result<Vec<Recipe>> {
    let content = fs::read_to_string(path)?;
    let recipes: Vec<Recipe> = serde_json::from_str(&content)?;
    let recipes = dedup_by_id(recipes);
    validate_recipes(&recipes)?;
    Ok(recipes)
}

/// Save a recipe catalog as pretty-printed JSON.
pub fn save_recipes<P: AsRef<Path>>(path: P, recipes: &[Recipe]) -> Result<()> {
    let deduped = dedup_by_id(recipes.to_vec());
    let json = serde_json::to_string_pretty(&deduped)?;
    fs::write(path, json)?;
    Ok(())
}

fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Recipe> = Vec::new();
    for recipe in recipes {
        match position.get(&recipe.id) {
            Some(&i) => out[i] = recipe,
            None => {
                position.insert(recipe.id.clone(), out.len());
                out.push(recipe);
            }
        }
    }
    out
}
