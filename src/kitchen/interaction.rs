use tracing::{debug, info, warn};

use crate::error::Result;
use crate::kitchen::stations;
use crate::kitchen::world::Kitchen;
use crate::models::{ActorId, ContainerId, FoodType, ItemId, Owner, Station, StationKind};
use crate::state::{EventQueue, GameEvent, RecipeBook};

/// Something an actor can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Container(ContainerId),
    Item(ItemId),
}

/// Who is interacting, with what in hand, and at what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionContext {
    pub actor: ActorId,
    pub held: Option<ItemId>,
    pub target: Target,
}

impl InteractionContext {
    pub fn new(kitchen: &Kitchen, actor: ActorId, target: Target) -> Self {
        Self {
            actor,
            held: kitchen.held_by(actor),
            target,
        }
    }

    pub fn has_item(&self) -> bool {
        self.held.is_some()
    }
}

/// Resolves interactions into state transitions.
///
/// Borrows the pieces of session state an interaction may touch. Every
/// entry point answers `handled`; `false` tells the caller the actor's item
/// was not taken and a fallback (drop, no-op) is up to them.
pub struct Dispatcher<'a> {
    pub kitchen: &'a mut Kitchen,
    pub book: &'a mut RecipeBook,
    pub events: &'a mut EventQueue,
}

impl<'a> Dispatcher<'a> {
    pub fn new(kitchen: &'a mut Kitchen, book: &'a mut RecipeBook, events: &'a mut EventQueue) -> Self {
        Self {
            kitchen,
            book,
            events,
        }
    }

    pub fn dispatch(&mut self, ctx: &InteractionContext) -> bool {
        match ctx.target {
            Target::Container(container) => self.container_interaction(container, ctx),
            Target::Item(item) => {
                let reachable = self
                    .kitchen
                    .item(item)
                    .is_some_and(|i| matches!(i.owner(), Owner::Loose | Owner::Container(_)));
                reachable && self.item_interaction(item, ctx)
            }
        }
    }

    /// The separate "cut" action; only cutting boards respond.
    pub fn cut(&mut self, target: Target) -> bool {
        match target {
            Target::Container(container) => {
                stations::cut_on_board(self.kitchen, container, self.events)
            }
            Target::Item(_) => false,
        }
    }

    fn container_interaction(&mut self, container: ContainerId, ctx: &InteractionContext) -> bool {
        let Some(station) = self.kitchen.container(container).map(|c| c.station.clone()) else {
            debug!("interaction with missing {}", container);
            return false;
        };

        match station {
            Station::Supply { food } => self.supply(food, ctx),
            Station::PlateDispenser(_) => self.dispense_plate(container, ctx),
            Station::Delivery { retire_on_success } => self.deliver(retire_on_success, ctx),
            Station::Trash => self.trash(ctx),
            Station::Counter | Station::CuttingBoard | Station::Stove { .. } => {
                self.surface(container, ctx)
            }
        }
    }

    /// Shared rules for every surface that can hold an item.
    fn surface(&mut self, container: ContainerId, ctx: &InteractionContext) -> bool {
        let on_surface = self.kitchen.container(container).and_then(|c| c.held());

        if let (Some(item), true) = (on_surface, ctx.has_item()) {
            // The item on the surface is what the actor is really touching.
            self.item_interaction(item, ctx);
            return true;
        }

        if ctx.has_item() {
            return self.try_receive(container, ctx);
        }

        self.take_from(container, ctx);
        true
    }

    fn try_receive(&mut self, container: ContainerId, ctx: &InteractionContext) -> bool {
        let Some(item) = ctx.held else { return false };
        if !handled(self.kitchen.place_on(item, container, self.events)) {
            return false;
        }
        self.on_placed(container, item);
        true
    }

    fn take_from(&mut self, container: ContainerId, ctx: &InteractionContext) -> bool {
        let Some(item) = self.kitchen.container(container).and_then(|c| c.held()) else {
            return false;
        };
        if !handled(self.kitchen.pick_up(ctx.actor, item, self.events)) {
            return false;
        }
        if self.kitchen.container(container).map(|c| c.kind()) == Some(StationKind::CuttingBoard) {
            self.events
                .push(GameEvent::CuttingProgressHidden { container });
        }
        true
    }

    fn on_placed(&mut self, container: ContainerId, item: ItemId) {
        if self.kitchen.container(container).map(|c| c.kind()) != Some(StationKind::CuttingBoard) {
            return;
        }
        if let Some(progress) = self
            .kitchen
            .item(item)
            .filter(|i| i.can_be_cut())
            .map(|i| i.cutting_progress())
        {
            self.events
                .push(GameEvent::CuttingProgressChanged { container, progress });
        }
    }

    /// An actor touching an item directly, or through the surface it sits on.
    fn item_interaction(&mut self, target: ItemId, ctx: &InteractionContext) -> bool {
        let Some(item) = self.kitchen.item(target) else {
            return false;
        };
        let target_is_plate = item.is_plate();
        let target_is_plateable = item.plateable.is_some();
        let held_is_plate = ctx
            .held
            .and_then(|h| self.kitchen.item(h))
            .is_some_and(|h| h.is_plate());

        match ctx.held {
            Some(held) if target_is_plate && held != target => {
                handled(self.kitchen.add_to_plate(target, held, self.events))
            }
            Some(held) if target_is_plateable && held_is_plate => {
                handled(self.kitchen.add_to_plate(held, target, self.events))
            }
            // Loose items never take an item from a hand.
            Some(_) => false,
            None => {
                handled(self.kitchen.pick_up(ctx.actor, target, self.events));
                true
            }
        }
    }

    fn supply(&mut self, food: FoodType, ctx: &InteractionContext) -> bool {
        if ctx.has_item() {
            return false;
        }
        let item = match self.kitchen.spawn_food(food, self.events) {
            Ok(item) => item,
            Err(e) => {
                warn!("supply crate cannot spawn {}: {}", food, e);
                return true;
            }
        };
        if !handled(self.kitchen.pick_up(ctx.actor, item, self.events)) {
            let _ = self.kitchen.destroy(item);
        }
        true
    }

    fn dispense_plate(&mut self, container: ContainerId, ctx: &InteractionContext) -> bool {
        if ctx.has_item() {
            return false;
        }
        match self.kitchen.top_of_stack(container) {
            Some(plate) => handled(self.kitchen.pick_up(ctx.actor, plate, self.events)),
            None => false,
        }
    }

    fn deliver(&mut self, retire_on_success: bool, ctx: &InteractionContext) -> bool {
        let Some(plate) = ctx.held else { return false };
        if !self.kitchen.item(plate).is_some_and(|i| i.is_plate()) {
            return false;
        }

        let ingredients = self.kitchen.plate_contents(plate);
        let Some(recipe) = self.book.check_match(&ingredients).cloned() else {
            info!(?ingredients, "delivery rejected: no active recipe matches");
            self.events.push(GameEvent::RecipeFailed { ingredients });
            return false;
        };

        if !handled(self.kitchen.destroy(plate)) {
            return false;
        }
        if retire_on_success {
            self.book.remove_from_menu(&recipe, self.events);
        }
        info!("delivered {} for {}", recipe.name, recipe.price);
        let price = recipe.price;
        self.events.push(GameEvent::RecipeSuccess { recipe, price });
        true
    }

    fn trash(&mut self, ctx: &InteractionContext) -> bool {
        let Some(item) = ctx.held else { return true };
        let Some(held) = self.kitchen.item(item) else {
            return false;
        };
        if !held.trashable {
            return false;
        }
        if held.is_plate() && !handled(self.kitchen.clear_plate(item, self.events)) {
            return false;
        }
        if !handled(self.kitchen.destroy(item)) {
            return false;
        }
        self.events.push(GameEvent::ItemTrashed { item });
        true
    }
}

/// Log a rejected transition and report whether it went through.
fn handled(result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(kind = ?e.kind(), "interaction not handled: {}", e);
            false
        }
    }
}
