pub mod autoplay;
pub mod cli;
pub mod error;
pub mod interface;
pub mod kitchen;
pub mod models;
pub mod state;

pub use error::{ErrorKind, KitchenError, Result};
pub use kitchen::{Kitchen, Target};
pub use models::{FoodType, Item, ItemId, PlateIngredient, Recipe};
pub use state::{GameEvent, GameSession, GameState, SessionConfig};
