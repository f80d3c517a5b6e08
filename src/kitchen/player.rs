use tracing::debug;

use crate::kitchen::interaction::{Dispatcher, InteractionContext, Target};
use crate::kitchen::world::Kitchen;
use crate::models::ActorId;
use crate::state::EventQueue;

/// One actor's view of the kitchen: what it is focused on and which way it faces.
#[derive(Debug, Clone)]
pub struct PlayerInteractor {
    pub actor: ActorId,
    focus: Option<Target>,
    facing: (f64, f64),
    /// Drop the held item when an interaction is not handled.
    pub drop_on_unhandled: bool,
}

impl PlayerInteractor {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            focus: None,
            facing: (0.0, 1.0),
            drop_on_unhandled: false,
        }
    }

    pub fn focus(&self) -> Option<Target> {
        self.focus
    }

    pub fn set_focus(&mut self, target: Option<Target>) {
        self.focus = target;
    }

    pub fn facing(&self) -> (f64, f64) {
        self.facing
    }

    /// Record movement input; a zero axis keeps the last facing.
    pub fn set_move_axis(&mut self, x: f64, y: f64) {
        let length = (x * x + y * y).sqrt();
        if length > f64::EPSILON {
            self.facing = (x / length, y / length);
        }
    }

    /// Focus the closest of `candidates`, ignoring the item this actor holds.
    ///
    /// Candidates are `(target, distance)` pairs produced by whatever does
    /// spatial queries. Returns the new focus.
    pub fn select_nearest(&mut self, kitchen: &Kitchen, candidates: &[(Target, f64)]) -> Option<Target> {
        let held = kitchen.held_by(self.actor);
        self.focus = candidates
            .iter()
            .filter(|(target, _)| !matches!(target, Target::Item(id) if Some(*id) == held))
            .filter(|(_, distance)| distance.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(target, _)| *target);
        self.focus
    }

    /// Interact with the focused target.
    pub fn interact(&mut self, dispatcher: &mut Dispatcher<'_>) -> bool {
        let Some(target) = self.focus else {
            return false;
        };
        let ctx = InteractionContext::new(dispatcher.kitchen, self.actor, target);
        let handled = dispatcher.dispatch(&ctx);

        if !handled && self.drop_on_unhandled && ctx.has_item() {
            self.drop_held(dispatcher.kitchen, dispatcher.events);
        }
        handled
    }

    /// Cut on the focused target.
    pub fn cut(&mut self, dispatcher: &mut Dispatcher<'_>) -> bool {
        match self.focus {
            Some(target) => dispatcher.cut(target),
            None => false,
        }
    }

    /// Let go of the held item in the facing direction.
    pub fn drop_held(&mut self, kitchen: &mut Kitchen, events: &mut EventQueue) -> bool {
        let Some(item) = kitchen.held_by(self.actor) else {
            return false;
        };
        match kitchen.drop_item(item, self.facing, events) {
            Ok(()) => true,
            Err(e) => {
                debug!("{} could not drop {}: {}", self.actor, item, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContainerId, FoodType, Owner};

    #[test]
    fn test_select_nearest_skips_held_item() {
        let mut kitchen = Kitchen::standard();
        let mut events = EventQueue::new();
        let actor = kitchen.add_actor();
        let bread = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();
        kitchen.pick_up(actor, bread, &mut events).unwrap();

        let mut player = PlayerInteractor::new(actor);
        let candidates = [
            (Target::Item(bread), 0.1),
            (Target::Container(ContainerId(5)), 1.5),
            (Target::Container(ContainerId(6)), 0.8),
        ];
        let focus = player.select_nearest(&kitchen, &candidates);
        assert_eq!(focus, Some(Target::Container(ContainerId(6))));
    }

    #[test]
    fn test_select_nearest_with_nothing_in_range() {
        let kitchen = Kitchen::standard();
        let mut player = PlayerInteractor::new(ActorId(0));
        player.set_focus(Some(Target::Container(ContainerId(0))));
        assert_eq!(player.select_nearest(&kitchen, &[]), None);
        assert_eq!(player.focus(), None);
    }

    #[test]
    fn test_facing_normalised_and_kept_on_idle() {
        let mut player = PlayerInteractor::new(ActorId(0));
        player.set_move_axis(3.0, 4.0);
        assert_eq!(player.facing(), (0.6, 0.8));
        player.set_move_axis(0.0, 0.0);
        assert_eq!(player.facing(), (0.6, 0.8));
    }

    #[test]
    fn test_drop_held_leaves_item_loose() {
        let mut kitchen = Kitchen::standard();
        let mut events = EventQueue::new();
        let actor = kitchen.add_actor();
        let bread = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();
        kitchen.pick_up(actor, bread, &mut events).unwrap();

        let mut player = PlayerInteractor::new(actor);
        assert!(player.drop_held(&mut kitchen, &mut events));
        assert_eq!(kitchen.held_by(actor), None);
        assert_eq!(kitchen.item(bread).unwrap().owner(), Owner::Loose);
        assert!(!player.drop_held(&mut kitchen, &mut events));
    }
}
