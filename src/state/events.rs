use crate::models::{ActorId, ContainerId, FoodType, ItemId, PlateIngredient, Recipe};
use crate::state::GameState;

/// Notifications published by the core for presentation collaborators.
///
/// Every event is pushed after the mutation it describes, so a reader
/// draining the queue always sees post-mutation state.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ItemSpawned {
        item: ItemId,
        food: Option<FoodType>,
    },
    ItemPickedUp {
        actor: ActorId,
        item: ItemId,
    },
    ItemPlaced {
        item: ItemId,
        container: ContainerId,
    },
    ItemDropped {
        item: ItemId,
        direction: (f64, f64),
    },
    ItemTrashed {
        item: ItemId,
    },
    PlateIngredientAdded {
        plate: ItemId,
        ingredient: PlateIngredient,
    },
    PlateIngredientRemoved {
        plate: ItemId,
        ingredient: PlateIngredient,
    },
    PlateSpawned {
        container: ContainerId,
        count: usize,
    },
    CuttingProgressChanged {
        container: ContainerId,
        progress: f64,
    },
    /// The cutting board no longer shows a progress bar.
    CuttingProgressHidden {
        container: ContainerId,
    },
    CuttingCompleted {
        container: ContainerId,
        result: FoodType,
    },
    CookingProgressChanged {
        container: ContainerId,
        progress: f64,
    },
    CookingCompleted {
        container: ContainerId,
        result: FoodType,
    },
    StoveToggled {
        container: ContainerId,
        active: bool,
    },
    RecipeSuccess {
        recipe: Recipe,
        price: u32,
    },
    RecipeFailed {
        ingredients: Vec<PlateIngredient>,
    },
    MenuUpdated {
        active: Vec<String>,
    },
    ScoreChanged {
        delivered: u32,
        total: u32,
    },
    TimeChanged {
        remaining: f64,
    },
    GameStateChanged {
        state: GameState,
    },
    PauseChanged {
        paused: bool,
    },
}

/// FIFO of pending events, drained once per tick or input.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
