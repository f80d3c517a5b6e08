use thiserror::Error;

use crate::models::{ActorId, ContainerId, FoodType, ItemId, PlateIngredient};

#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("Actor {0} already holds an item")]
    HandsFull(ActorId),

    #[error("Item {0} is already held by another actor")]
    AlreadyHeld(ItemId),

    #[error("Container {0} already holds an item")]
    ContainerOccupied(ContainerId),

    #[error("Container {container} does not accept item {item}")]
    NotAccepted { container: ContainerId, item: ItemId },

    #[error("Item {0} cannot go on a plate")]
    NotPlateable(ItemId),

    #[error("Plate already holds {0:?}")]
    DuplicateIngredient(PlateIngredient),

    #[error("Plate has no free slot for {0:?}")]
    NoFreeSlot(PlateIngredient),

    #[error("Item {0} is not a plate")]
    NotAPlate(ItemId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Container not found: {0}")]
    ContainerNotFound(ContainerId),

    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("No catalog entry for {0:?}")]
    CatalogEntryMissing(FoodType),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse grouping of [`KitchenError`] used by callers to pick a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The target cannot take the requested transition; recover locally.
    Rejected,
    /// A lookup came back empty.
    NotFound,
    /// State that should be impossible; the operation was aborted.
    InvariantViolation,
    /// I/O, parsing or prompt failures outside the game core.
    External,
}

impl KitchenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KitchenError::HandsFull(_)
            | KitchenError::AlreadyHeld(_)
            | KitchenError::ContainerOccupied(_)
            | KitchenError::NotAccepted { .. }
            | KitchenError::NotPlateable(_)
            | KitchenError::DuplicateIngredient(_)
            | KitchenError::NoFreeSlot(_)
            | KitchenError::NotAPlate(_) => ErrorKind::Rejected,
            KitchenError::ItemNotFound(_)
            | KitchenError::ContainerNotFound(_)
            | KitchenError::ActorNotFound(_)
            | KitchenError::RecipeNotFound(_)
            | KitchenError::CatalogEntryMissing(_) => ErrorKind::NotFound,
            KitchenError::InvariantViolation(_) => ErrorKind::InvariantViolation,
            KitchenError::Io(_)
            | KitchenError::Json(_)
            | KitchenError::Prompt(_)
            | KitchenError::Csv(_)
            | KitchenError::InvalidInput(_) => ErrorKind::External,
        }
    }
}

pub type Result<T> = std::result::Result<T, KitchenError>;
