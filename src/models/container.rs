use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{FoodType, Item, ItemId};

/// Identity of a fixed surface; an index into the kitchen's station list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub usize);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station#{}", self.0)
    }
}

/// Stack of ready plates plus its refill timer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateDispenser {
    pub(crate) stack: Vec<ItemId>,
    pub(crate) timer: f64,
    pub spawn_secs: f64,
    pub capacity: usize,
}

impl PlateDispenser {
    pub fn new(spawn_secs: f64, capacity: usize) -> Self {
        Self {
            stack: Vec::new(),
            timer: 0.0,
            spawn_secs,
            capacity,
        }
    }

    pub fn count(&self) -> usize {
        self.stack.len()
    }

    pub fn is_full(&self) -> bool {
        self.stack.len() >= self.capacity
    }
}

/// Behaviour variant of a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Station {
    /// Plain counter: holds anything.
    Counter,
    /// Crate that hands out fresh items of one food.
    Supply { food: FoodType },
    PlateDispenser(PlateDispenser),
    CuttingBoard,
    Stove { active: bool },
    Delivery { retire_on_success: bool },
    Trash,
}

/// Variant tag, for lookups and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationKind {
    Counter,
    Supply,
    PlateDispenser,
    CuttingBoard,
    Stove,
    Delivery,
    Trash,
}

impl Station {
    pub fn kind(&self) -> StationKind {
        match self {
            Station::Counter => StationKind::Counter,
            Station::Supply { .. } => StationKind::Supply,
            Station::PlateDispenser(_) => StationKind::PlateDispenser,
            Station::CuttingBoard => StationKind::CuttingBoard,
            Station::Stove { .. } => StationKind::Stove,
            Station::Delivery { .. } => StationKind::Delivery,
            Station::Trash => StationKind::Trash,
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StationKind::Counter => "counter",
            StationKind::Supply => "supply crate",
            StationKind::PlateDispenser => "plate dispenser",
            StationKind::CuttingBoard => "cutting board",
            StationKind::Stove => "stove",
            StationKind::Delivery => "delivery",
            StationKind::Trash => "trash",
        };
        write!(f, "{}", name)
    }
}

/// A fixed surface that holds at most one top-level item.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    pub station: Station,
    held: Option<ItemId>,
}

impl Container {
    pub fn new(id: ContainerId, name: impl Into<String>, station: Station) -> Self {
        Self {
            id,
            name: name.into(),
            station,
            held: None,
        }
    }

    pub fn from_spec(id: ContainerId, spec: &StationSpec) -> Self {
        let station = match spec.station {
            StationConfig::Counter => Station::Counter,
            StationConfig::Supply { food } => Station::Supply { food },
            StationConfig::PlateDispenser {
                spawn_secs,
                capacity,
            } => Station::PlateDispenser(PlateDispenser::new(spawn_secs, capacity)),
            StationConfig::CuttingBoard => Station::CuttingBoard,
            StationConfig::Stove => Station::Stove { active: false },
            StationConfig::Delivery { retire_on_success } => {
                Station::Delivery { retire_on_success }
            }
            StationConfig::Trash => Station::Trash,
        };
        Self::new(id, spec.name.clone(), station)
    }

    pub fn kind(&self) -> StationKind {
        self.station.kind()
    }

    pub fn held(&self) -> Option<ItemId> {
        self.held
    }

    pub(crate) fn set_held(&mut self, item: Option<ItemId>) {
        self.held = item;
    }

    pub fn is_occupied(&self) -> bool {
        self.held.is_some()
    }

    /// Whether this station would take the item at all, ignoring occupancy.
    pub fn accepts(&self, item: &Item) -> bool {
        match &self.station {
            Station::Counter => true,
            Station::CuttingBoard => item.cuttable.is_some(),
            Station::Stove { .. } => item.cookable.is_some(),
            // Delivery and trash consume what they are given and never hold it.
            Station::Supply { .. }
            | Station::PlateDispenser(_)
            | Station::Delivery { .. }
            | Station::Trash => false,
        }
    }

    pub fn dispenser(&self) -> Option<&PlateDispenser> {
        match &self.station {
            Station::PlateDispenser(dispenser) => Some(dispenser),
            _ => None,
        }
    }

    pub fn is_active_stove(&self) -> bool {
        matches!(self.station, Station::Stove { active: true })
    }
}

/// Serialized description of one station in a kitchen layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSpec {
    pub name: String,

    #[serde(flatten)]
    pub station: StationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StationConfig {
    Counter,
    Supply {
        food: FoodType,
    },
    PlateDispenser {
        spawn_secs: f64,
        capacity: usize,
    },
    CuttingBoard,
    Stove,
    Delivery {
        #[serde(default = "default_retire")]
        retire_on_success: bool,
    },
    Trash,
}

fn default_retire() -> bool {
    true
}

impl StationSpec {
    pub fn new(name: impl Into<String>, station: StationConfig) -> Self {
        Self {
            name: name.into(),
            station,
        }
    }
}
