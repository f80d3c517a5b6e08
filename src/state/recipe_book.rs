use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KitchenError, Result};
use crate::kitchen::constants::{MAX_ADD_SECS, MAX_MENU_SIZE, MIN_ADD_SECS};
use crate::models::{PlateIngredient, Recipe, validate_recipes};
use crate::state::{EventQueue, GameEvent};

/// Menu rotation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    pub max_menu_size: usize,

    /// Delay before the next promotion while the menu is empty.
    pub min_add_secs: f64,

    /// Delay before the next promotion once the menu is nearly full.
    pub max_add_secs: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            max_menu_size: MAX_MENU_SIZE,
            min_add_secs: MIN_ADD_SECS,
            max_add_secs: MAX_ADD_SECS,
        }
    }
}

impl MenuConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_menu_size == 0 {
            return Err(KitchenError::InvalidInput(
                "max_menu_size must be at least 1".to_string(),
            ));
        }
        if !(self.min_add_secs >= 0.0) || !(self.max_add_secs >= self.min_add_secs) {
            return Err(KitchenError::InvalidInput(format!(
                "menu add delays must satisfy 0 <= min ({}) <= max ({})",
                self.min_add_secs, self.max_add_secs
            )));
        }
        Ok(())
    }

    /// Delay before the next promotion for a menu holding `active` recipes.
    pub fn add_delay(&self, active: usize) -> f64 {
        let fullness = active as f64 / self.max_menu_size as f64;
        self.min_add_secs + (self.max_add_secs - self.min_add_secs) * fullness
    }
}

/// The recipe catalog split into the active menu and the waiting pool.
///
/// Both pools hold indices into the immutable catalog, so every recipe is in
/// exactly one of them.
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    active: Vec<usize>,
    inactive: Vec<usize>,
    config: MenuConfig,
    timer: f64,
    next_add: f64,
    rng: StdRng,
}

impl RecipeBook {
    pub fn new(recipes: Vec<Recipe>, config: MenuConfig, rng: StdRng) -> Result<Self> {
        validate_recipes(&recipes)?;
        config.validate()?;
        let inactive = (0..recipes.len()).collect();
        let next_add = config.add_delay(0);
        Ok(Self {
            recipes,
            active: Vec::new(),
            inactive,
            config,
            timer: 0.0,
            next_add,
            rng,
        })
    }

    /// Book whose random promotions are reproducible from `seed`.
    pub fn with_seed(recipes: Vec<Recipe>, config: MenuConfig, seed: u64) -> Result<Self> {
        Self::new(recipes, config, StdRng::seed_from_u64(seed))
    }

    /// Put the first recipe on the menu; called once when a session opens.
    pub fn open(&mut self, events: &mut EventQueue) {
        if self.active.is_empty() {
            self.promote_random(events);
            self.reset_timer();
        }
    }

    /// Move every recipe back to the pool and open again.
    pub fn reset(&mut self, events: &mut EventQueue) {
        self.active.clear();
        self.inactive = (0..self.recipes.len()).collect();
        self.timer = 0.0;
        self.next_add = self.config.add_delay(0);
        events.push(self.menu_event());
        self.open(events);
    }

    /// Advance the rotation timer.
    ///
    /// A long tick can cover several promotions; each one spends its
    /// threshold and the remainder carries over. While the menu is full the
    /// timer holds at the threshold, so a removal is refilled on the next tick.
    pub fn tick(&mut self, delta_secs: f64, events: &mut EventQueue) {
        self.timer += delta_secs.max(0.0);
        while self.timer >= self.next_add && self.promote_random(events).is_some() {
            self.timer -= self.next_add;
            self.next_add = self.config.add_delay(self.active.len());
        }
        if self.active.len() >= self.config.max_menu_size {
            self.timer = self.timer.min(self.next_add);
        }
    }

    fn reset_timer(&mut self) {
        self.next_add = self.config.add_delay(self.active.len());
        self.timer = 0.0;
    }

    fn promote_random(&mut self, events: &mut EventQueue) -> Option<usize> {
        if self.inactive.is_empty() || self.active.len() >= self.config.max_menu_size {
            return None;
        }
        let pick = self.rng.gen_range(0..self.inactive.len());
        let index = self.inactive.remove(pick);
        self.active.push(index);
        debug!("menu gained {}", self.recipes[index].id);
        events.push(self.menu_event());
        Some(index)
    }

    /// First active recipe, in menu order, whose ingredients equal `ingredients`.
    pub fn check_match(&self, ingredients: &[PlateIngredient]) -> Option<&Recipe> {
        self.active
            .iter()
            .map(|&i| &self.recipes[i])
            .find(|recipe| recipe.matches(ingredients))
    }

    /// Move a recipe back to the pool. Returns `false` if it was not on the menu.
    pub fn remove_from_menu(&mut self, recipe: &Recipe, events: &mut EventQueue) -> bool {
        self.remove_by_id(&recipe.id, events)
    }

    pub fn remove_by_id(&mut self, recipe_id: &str, events: &mut EventQueue) -> bool {
        let Some(pos) = self
            .active
            .iter()
            .position(|&i| self.recipes[i].id == recipe_id)
        else {
            return false;
        };
        let index = self.active.remove(pos);
        self.inactive.push(index);
        debug!("menu lost {}", recipe_id);
        events.push(self.menu_event());
        true
    }

    fn menu_event(&self) -> GameEvent {
        GameEvent::MenuUpdated {
            active: self.active_ids(),
        }
    }

    pub fn get(&self, recipe_id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == recipe_id)
    }

    pub fn all_recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn active_recipes(&self) -> Vec<&Recipe> {
        self.active.iter().map(|&i| &self.recipes[i]).collect()
    }

    pub fn inactive_recipes(&self) -> Vec<&Recipe> {
        self.inactive.iter().map(|&i| &self.recipes[i]).collect()
    }

    pub fn active_ids(&self) -> Vec<String> {
        self.active.iter().map(|&i| self.recipes[i].id.clone()).collect()
    }

    pub fn is_active(&self, recipe_id: &str) -> bool {
        self.active.iter().any(|&i| self.recipes[i].id == recipe_id)
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Seconds accumulated toward the next promotion.
    pub fn timer(&self) -> f64 {
        self.timer
    }

    pub fn next_add_secs(&self) -> f64 {
        self.next_add
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::standard_recipes;

    fn book(seed: u64) -> RecipeBook {
        RecipeBook::with_seed(standard_recipes(), MenuConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_open_promotes_one() {
        let mut book = book(7);
        let mut events = EventQueue::new();
        book.open(&mut events);
        assert_eq!(book.active_recipes().len(), 1);
        assert_eq!(book.next_add_secs(), book.config().add_delay(1));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_add_delay_interpolates() {
        let config = MenuConfig::default();
        assert_eq!(config.add_delay(0), config.min_add_secs);
        assert_eq!(config.add_delay(config.max_menu_size), config.max_add_secs);
        let mid = config.add_delay(config.max_menu_size / 2);
        assert!(mid > config.min_add_secs && mid < config.max_add_secs);
    }

    #[test]
    fn test_reject_invalid_config() {
        let config = MenuConfig {
            max_menu_size: 3,
            min_add_secs: 10.0,
            max_add_secs: 2.0,
        };
        assert!(RecipeBook::with_seed(standard_recipes(), config, 1).is_err());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut book = book(3);
        let mut events = EventQueue::new();
        book.open(&mut events);
        let id = book.active_ids()[0].clone();

        assert!(book.remove_by_id(&id, &mut events));
        let recipe = book.get(&id).unwrap().clone();
        assert!(!book.remove_from_menu(&recipe, &mut events));
        assert!(!book.is_active(&id));
        assert_eq!(book.inactive_recipes().len(), book.all_recipes().len());
    }

    #[test]
    fn test_reset_starts_over() {
        let mut book = book(11);
        let mut events = EventQueue::new();
        book.open(&mut events);
        for _ in 0..50 {
            book.tick(1.0, &mut events);
        }
        assert!(book.active_recipes().len() > 1);

        book.reset(&mut events);
        assert_eq!(book.active_recipes().len(), 1);
        assert_eq!(book.timer(), 0.0);
    }
}
