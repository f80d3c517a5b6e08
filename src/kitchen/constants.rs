use crate::models::{FoodType, StationConfig, StationSpec};

// ─────────────────────────────────────────────────────────────────────────────
// Session timing
// ─────────────────────────────────────────────────────────────────────────────

/// Length of a round once the countdown ends.
pub const GAME_SECS: f64 = 300.0;

/// Countdown before play starts.
pub const COUNTDOWN_SECS: f64 = 3.0;

// ─────────────────────────────────────────────────────────────────────────────
// Menu rotation
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum number of recipes on the menu at once.
pub const MAX_MENU_SIZE: usize = 6;

/// Delay before the next promotion when the menu is empty.
pub const MIN_ADD_SECS: f64 = 3.0;

/// Delay before the next promotion when the menu is full.
pub const MAX_ADD_SECS: f64 = 12.0;

// ─────────────────────────────────────────────────────────────────────────────
// Stations
// ─────────────────────────────────────────────────────────────────────────────

/// Seconds between plates appearing on a dispenser.
pub const PLATE_SPAWN_SECS: f64 = 4.0;

/// Plates a dispenser stacks before it stops spawning.
pub const MAX_PLATE_COUNT: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Food preparation
// ─────────────────────────────────────────────────────────────────────────────

pub const TOMATO_CUTS: u32 = 3;
pub const CHEESE_CUTS: u32 = 2;
pub const CABBAGE_CUTS: u32 = 5;

/// Raw meat to cooked.
pub const MEAT_COOK_SECS: f64 = 5.0;

/// Cooked meat left on the stove until it burns.
pub const MEAT_BURN_SECS: f64 = 8.0;

/// The stations of the standard kitchen.
pub fn default_layout() -> Vec<StationSpec> {
    let mut stations: Vec<StationSpec> = [
        FoodType::Bread,
        FoodType::Cheese,
        FoodType::Tomato,
        FoodType::Cabbage,
        FoodType::UncookedMeat,
    ]
    .into_iter()
    .map(|food| StationSpec::new(format!("{} Crate", food), StationConfig::Supply { food }))
    .collect();

    stations.extend([
        StationSpec::new("Counter A", StationConfig::Counter),
        StationSpec::new("Counter B", StationConfig::Counter),
        StationSpec::new("Cutting Board", StationConfig::CuttingBoard),
        StationSpec::new("Stove", StationConfig::Stove),
        StationSpec::new(
            "Plate Rack",
            StationConfig::PlateDispenser {
                spawn_secs: PLATE_SPAWN_SECS,
                capacity: MAX_PLATE_COUNT,
            },
        ),
        StationSpec::new(
            "Delivery Window",
            StationConfig::Delivery {
                retire_on_success: true,
            },
        ),
        StationSpec::new("Trash Bin", StationConfig::Trash),
    ]);
    stations
}
