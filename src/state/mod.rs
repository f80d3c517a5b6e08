mod events;
mod persistence;
mod recipe_book;
mod session;

pub use events::{EventQueue, GameEvent};
pub use persistence::{load_config, load_recipes, save_config, save_recipes};
pub use recipe_book::{MenuConfig, RecipeBook};
pub use session::{GameSession, GameState, InputEvent, Score, SessionConfig};
