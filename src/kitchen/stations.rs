use tracing::{debug, warn};

use crate::kitchen::world::Kitchen;
use crate::models::{ContainerId, Station, StationKind};
use crate::state::{EventQueue, GameEvent};

/// Advance every timed station by `delta_secs`.
pub fn tick_stations(kitchen: &mut Kitchen, delta_secs: f64, events: &mut EventQueue) {
    let delta_secs = delta_secs.max(0.0);
    for index in 0..kitchen.containers().len() {
        let container = ContainerId(index);
        match kitchen.container(container).map(|c| c.kind()) {
            Some(StationKind::PlateDispenser) => {
                tick_dispenser(kitchen, container, delta_secs, events)
            }
            Some(StationKind::Stove) => tick_stove(kitchen, container, delta_secs, events),
            _ => {}
        }
    }
}

/// Refill a plate dispenser. The timer only runs while the stack has room.
///
/// A long tick can span several intervals; each one spawns a plate and the
/// remainder carries over.
fn tick_dispenser(
    kitchen: &mut Kitchen,
    container: ContainerId,
    delta_secs: f64,
    events: &mut EventQueue,
) {
    let mut delta = Some(delta_secs);
    loop {
        let Some(Station::PlateDispenser(dispenser)) =
            kitchen.container_mut(container).map(|c| &mut c.station)
        else {
            return;
        };
        if dispenser.is_full() {
            dispenser.timer = 0.0;
            return;
        }
        if let Some(delta) = delta.take() {
            dispenser.timer += delta;
        }
        if dispenser.timer < dispenser.spawn_secs {
            return;
        }
        dispenser.timer = (dispenser.timer - dispenser.spawn_secs).max(0.0);

        match kitchen.stack_plate(container, events) {
            Ok(count) => {
                debug!("{} now stacks {} plates", container, count);
                events.push(GameEvent::PlateSpawned { container, count });
            }
            Err(e) => {
                warn!("plate refill failed on {}: {}", container, e);
                return;
            }
        }
    }
}

/// Cook whatever sits on the stove and keep the stove's on/off flag current.
///
/// Time left over when a cook completes goes on to the produced item, so
/// cooked food keeps heading toward burnt within the same tick.
fn tick_stove(
    kitchen: &mut Kitchen,
    container: ContainerId,
    delta_secs: f64,
    events: &mut EventQueue,
) {
    let mut remaining = delta_secs;
    loop {
        let held = kitchen.container(container).and_then(|c| c.held());
        let cooking = held
            .and_then(|id| kitchen.item(id))
            .is_some_and(|item| item.can_be_cooked());
        set_stove_active(kitchen, container, cooking, events);

        let Some(id) = held.filter(|_| cooking && remaining > 0.0) else {
            return;
        };
        let Some(item) = kitchen.item_mut(id) else {
            return;
        };
        let needed = item.cook_remaining_secs();
        let result = item.cook(remaining);
        let progress = item.cooking_progress();
        events.push(GameEvent::CookingProgressChanged {
            container,
            progress,
        });

        let Some(food) = result else {
            return;
        };
        remaining = (remaining - needed).max(0.0);
        match kitchen.replace_item(id, food, events) {
            Ok(_) => {
                debug!("{} finished cooking {}", container, food);
                events.push(GameEvent::CookingCompleted {
                    container,
                    result: food,
                });
            }
            Err(e) => {
                warn!("{} could not produce {}: {}", container, food, e);
                return;
            }
        }
    }
}

fn set_stove_active(
    kitchen: &mut Kitchen,
    container: ContainerId,
    active: bool,
    events: &mut EventQueue,
) {
    if let Some(Station::Stove { active: current }) =
        kitchen.container_mut(container).map(|c| &mut c.station)
    {
        if *current != active {
            *current = active;
            events.push(GameEvent::StoveToggled { container, active });
        }
    }
}

/// One knife stroke on a cutting board.
///
/// Returns `true` when a stroke landed; boards that are empty or hold
/// something uncuttable ignore the action.
pub fn cut_on_board(kitchen: &mut Kitchen, container: ContainerId, events: &mut EventQueue) -> bool {
    if kitchen.container(container).map(|c| c.kind()) != Some(StationKind::CuttingBoard) {
        return false;
    }
    let Some(id) = kitchen.container(container).and_then(|c| c.held()) else {
        return false;
    };
    let Some(item) = kitchen.item_mut(id).filter(|item| item.can_be_cut()) else {
        return false;
    };

    let result = item.cut();
    let progress = item.cutting_progress();
    events.push(GameEvent::CuttingProgressChanged {
        container,
        progress,
    });

    if let Some(food) = result {
        match kitchen.replace_item(id, food, events) {
            Ok(_) => {
                debug!("{} finished cutting {}", container, food);
                events.push(GameEvent::CuttingCompleted {
                    container,
                    result: food,
                });
                events.push(GameEvent::CuttingProgressHidden { container });
            }
            Err(e) => warn!("{} could not produce {}: {}", container, food, e),
        }
    }
    true
}
