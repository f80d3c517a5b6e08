pub mod constants;
pub mod interaction;
pub mod player;
pub mod stations;
pub mod world;

pub use interaction::{Dispatcher, InteractionContext, Target};
pub use player::PlayerInteractor;
pub use stations::{cut_on_board, tick_stations};
pub use world::Kitchen;
