pub mod container;
pub mod food;
pub mod item;
pub mod plate;
pub mod recipe;

pub use container::{
    Container, ContainerId, PlateDispenser, Station, StationConfig, StationKind, StationSpec,
};
pub use food::{
    CookSpec, CutSpec, FoodCatalog, FoodSpec, FoodType, PlateIngredient, PlateTemplate, PrepStep,
};
pub use item::{ActorId, Cookable, Cuttable, Item, ItemId, Owner};
pub use plate::{Plate, PlateSlot};
pub use recipe::{Recipe, standard_recipes, validate_recipes};
