use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{KitchenError, Result};
use crate::kitchen::constants::default_layout;
use crate::models::{
    ActorId, Container, ContainerId, FoodCatalog, FoodType, Item, ItemId, Owner, PlateIngredient,
    Station, StationKind, StationSpec,
};
use crate::state::{EventQueue, GameEvent};

/// Owns every item, station and pair of hands in one session.
///
/// All ownership transitions go through here so that an item's owner and the
/// owner's back-reference always change together.
pub struct Kitchen {
    catalog: FoodCatalog,
    layout: Vec<StationSpec>,
    items: BTreeMap<ItemId, Item>,
    containers: Vec<Container>,
    hands: Vec<Option<ItemId>>,
    next_item: u32,
}

impl Kitchen {
    pub fn new(catalog: FoodCatalog, layout: &[StationSpec]) -> Self {
        let containers = layout
            .iter()
            .enumerate()
            .map(|(i, spec)| Container::from_spec(ContainerId(i), spec))
            .collect();
        Self {
            catalog,
            layout: layout.to_vec(),
            items: BTreeMap::new(),
            containers,
            hands: Vec::new(),
            next_item: 1,
        }
    }

    /// Standard foods on the standard layout.
    pub fn standard() -> Self {
        Self::new(FoodCatalog::standard(), &default_layout())
    }

    pub fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &[StationSpec] {
        &self.layout
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_actor(&mut self) -> ActorId {
        self.hands.push(None);
        ActorId((self.hands.len() - 1) as u32)
    }

    pub fn actor_count(&self) -> usize {
        self.hands.len()
    }

    pub fn held_by(&self, actor: ActorId) -> Option<ItemId> {
        self.hands.get(actor.0 as usize).copied().flatten()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id.0)
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(id.0)
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn stations_of(&self, kind: StationKind) -> Vec<ContainerId> {
        self.containers
            .iter()
            .filter(|c| c.kind() == kind)
            .map(|c| c.id)
            .collect()
    }

    pub fn find_station(&self, kind: StationKind) -> Option<ContainerId> {
        self.containers.iter().find(|c| c.kind() == kind).map(|c| c.id)
    }

    /// The supply crate handing out `food`, if the layout has one.
    pub fn supply_for(&self, food: FoodType) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|c| matches!(c.station, Station::Supply { food: f } if f == food))
            .map(|c| c.id)
    }

    /// Food type of the item sitting on a container.
    pub fn food_on(&self, container: ContainerId) -> Option<FoodType> {
        self.container(container)
            .and_then(|c| c.held())
            .and_then(|id| self.item(id))
            .and_then(|item| item.food)
    }

    /// Ingredients on a plate item; empty when the item is not a plate.
    pub fn plate_contents(&self, plate: ItemId) -> Vec<PlateIngredient> {
        self.item(plate)
            .and_then(|item| item.plate.as_ref())
            .map(|p| p.occupied_ingredients())
            .unwrap_or_default()
    }

    fn require_item(&self, id: ItemId) -> Result<&Item> {
        self.items.get(&id).ok_or(KitchenError::ItemNotFound(id))
    }

    fn require_container(&self, id: ContainerId) -> Result<&Container> {
        self.containers
            .get(id.0)
            .ok_or(KitchenError::ContainerNotFound(id))
    }

    fn require_hand(&self, actor: ActorId) -> Result<Option<ItemId>> {
        self.hands
            .get(actor.0 as usize)
            .copied()
            .ok_or(KitchenError::ActorNotFound(actor))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    fn allocate_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item += 1;
        id
    }

    /// Create a loose item from the catalog template for `food`.
    pub fn spawn_food(&mut self, food: FoodType, events: &mut EventQueue) -> Result<ItemId> {
        let spec = self
            .catalog
            .get(food)
            .cloned()
            .ok_or(KitchenError::CatalogEntryMissing(food))?;
        let id = self.allocate_id();
        self.items.insert(id, Item::from_spec(id, &spec));
        events.push(GameEvent::ItemSpawned {
            item: id,
            food: Some(food),
        });
        Ok(id)
    }

    /// Create a loose, empty plate.
    pub fn spawn_plate(&mut self, events: &mut EventQueue) -> ItemId {
        let id = self.allocate_id();
        self.items.insert(id, Item::new_plate(id, &self.catalog.plate));
        events.push(GameEvent::ItemSpawned {
            item: id,
            food: None,
        });
        id
    }

    /// Remove an item from the world; a plate takes its occupants with it.
    pub fn destroy(&mut self, id: ItemId) -> Result<()> {
        self.require_item(id)?;
        let occupants = self
            .items
            .get_mut(&id)
            .and_then(|item| item.plate.as_mut())
            .map(|plate| plate.clear())
            .unwrap_or_default();
        for occupant in occupants {
            self.items.remove(&occupant);
        }
        self.detach(id)?;
        self.items.remove(&id);
        Ok(())
    }

    /// Clear whatever currently references the item and leave it loose.
    fn detach(&mut self, id: ItemId) -> Result<()> {
        let owner = self.require_item(id)?.owner();
        match owner {
            Owner::Loose => {}
            Owner::Hand(actor) => {
                if let Some(hand) = self.hands.get_mut(actor.0 as usize) {
                    if *hand == Some(id) {
                        *hand = None;
                    }
                }
            }
            Owner::Container(container) => {
                if let Some(c) = self.containers.get_mut(container.0) {
                    if c.held() == Some(id) {
                        c.set_held(None);
                    }
                }
            }
            Owner::Stack(container) => {
                if let Some(Station::PlateDispenser(dispenser)) = self
                    .containers
                    .get_mut(container.0)
                    .map(|c| &mut c.station)
                {
                    dispenser.stack.retain(|&plate| plate != id);
                }
            }
            Owner::PlateSlot { plate, slot } => {
                if let Some(p) = self.items.get_mut(&plate).and_then(|i| i.plate.as_mut()) {
                    p.vacate_slot(slot);
                }
            }
        }
        if let Some(item) = self.items.get_mut(&id) {
            item.set_owner(Owner::Loose);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Ownership transitions
    // ─────────────────────────────────────────────────────────────────────

    /// Put an item in an actor's hand, releasing it from wherever it was.
    pub fn pick_up(&mut self, actor: ActorId, id: ItemId, events: &mut EventQueue) -> Result<()> {
        let hand = self.require_hand(actor)?;
        let item = self.require_item(id)?;

        match item.held_by() {
            Some(holder) if holder == actor => return Ok(()),
            Some(_) => return Err(KitchenError::AlreadyHeld(id)),
            None => {}
        }
        if hand.is_some() {
            return Err(KitchenError::HandsFull(actor));
        }

        self.detach(id)?;
        if let Some(item) = self.items.get_mut(&id) {
            item.set_owner(Owner::Hand(actor));
        }
        self.hands[actor.0 as usize] = Some(id);
        events.push(GameEvent::ItemPickedUp { actor, item: id });
        Ok(())
    }

    /// Bind an item to a container.
    ///
    /// Rejected when the container is occupied or does not take this item.
    pub fn place_on(
        &mut self,
        id: ItemId,
        container: ContainerId,
        events: &mut EventQueue,
    ) -> Result<()> {
        let target = self.require_container(container)?;
        let item = self.require_item(id)?;

        if target.is_occupied() {
            return Err(KitchenError::ContainerOccupied(container));
        }
        if !target.accepts(item) {
            return Err(KitchenError::NotAccepted { container, item: id });
        }

        self.detach(id)?;
        if let Some(item) = self.items.get_mut(&id) {
            item.set_owner(Owner::Container(container));
        }
        self.containers[container.0].set_held(Some(id));
        events.push(GameEvent::ItemPlaced { item: id, container });
        Ok(())
    }

    /// Release an item to world physics.
    pub fn drop_item(
        &mut self,
        id: ItemId,
        direction: (f64, f64),
        events: &mut EventQueue,
    ) -> Result<()> {
        self.detach(id)?;
        events.push(GameEvent::ItemDropped { item: id, direction });
        Ok(())
    }

    /// Move an ingredient into the first free matching slot of a plate.
    pub fn add_to_plate(
        &mut self,
        plate: ItemId,
        id: ItemId,
        events: &mut EventQueue,
    ) -> Result<()> {
        let item = self.require_item(id)?;
        let ingredient = item.plateable.ok_or(KitchenError::NotPlateable(id))?;
        let slots = self
            .require_item(plate)?
            .plate
            .as_ref()
            .ok_or(KitchenError::NotAPlate(plate))?;

        if slots.holds(ingredient) {
            return Err(KitchenError::DuplicateIngredient(ingredient));
        }
        let slot = slots
            .free_slot_for(ingredient)
            .ok_or(KitchenError::NoFreeSlot(ingredient))?;

        self.detach(id)?;
        if let Some(p) = self.items.get_mut(&plate).and_then(|i| i.plate.as_mut()) {
            p.occupy(slot, id);
        }
        if let Some(item) = self.items.get_mut(&id) {
            item.set_owner(Owner::PlateSlot { plate, slot });
        }
        events.push(GameEvent::PlateIngredientAdded { plate, ingredient });
        Ok(())
    }

    /// Take an ingredient back off a plate; it is left loose.
    pub fn remove_from_plate(
        &mut self,
        plate: ItemId,
        ingredient: PlateIngredient,
        events: &mut EventQueue,
    ) -> Result<Option<ItemId>> {
        let slots = self
            .require_item(plate)?
            .plate
            .as_ref()
            .ok_or(KitchenError::NotAPlate(plate))?;
        let Some(slot) = slots.slot_of(ingredient) else {
            return Ok(None);
        };
        let occupant = slots.slots()[slot].occupant;

        if let Some(id) = occupant {
            self.detach(id)?;
            events.push(GameEvent::PlateIngredientRemoved { plate, ingredient });
        }
        Ok(occupant)
    }

    /// Destroy every ingredient on a plate.
    pub fn clear_plate(&mut self, plate: ItemId, events: &mut EventQueue) -> Result<()> {
        let ingredients = self.plate_contents(plate);
        let occupants = self
            .items
            .get_mut(&plate)
            .and_then(|i| i.plate.as_mut())
            .ok_or(KitchenError::NotAPlate(plate))?
            .clear();
        for occupant in occupants {
            self.items.remove(&occupant);
        }
        for ingredient in ingredients {
            events.push(GameEvent::PlateIngredientRemoved { plate, ingredient });
        }
        Ok(())
    }

    /// Swap an item for a freshly spawned one of type `food` in the same place.
    ///
    /// The new item inherits the old one's owner. When the catalog has no
    /// template the swap is abandoned and the original item stays put.
    pub fn replace_item(
        &mut self,
        old: ItemId,
        food: FoodType,
        events: &mut EventQueue,
    ) -> Result<ItemId> {
        let owner = self.require_item(old)?.owner();
        let spec = match self.catalog.get(food) {
            Some(spec) => spec.clone(),
            None => {
                warn!(?food, "no template for produced food; keeping {}", old);
                return Err(KitchenError::CatalogEntryMissing(food));
            }
        };

        if let Owner::PlateSlot { plate, slot } = owner {
            let accepted = self
                .item(plate)
                .and_then(|p| p.plate.as_ref())
                .and_then(|p| p.slots().get(slot))
                .map(|s| s.accepts);
            if accepted.is_none() || accepted != spec.plate_form {
                return Err(KitchenError::InvariantViolation(format!(
                    "{} cannot replace {} in slot {} of {}",
                    food, old, slot, plate
                )));
            }
        }

        self.destroy(old)?;
        let id = self.allocate_id();
        let mut item = Item::from_spec(id, &spec);
        item.set_owner(owner);
        self.items.insert(id, item);

        match owner {
            Owner::Loose => {}
            Owner::Hand(actor) => self.hands[actor.0 as usize] = Some(id),
            Owner::Container(container) => self.containers[container.0].set_held(Some(id)),
            Owner::Stack(container) => {
                if let Station::PlateDispenser(dispenser) = &mut self.containers[container.0].station
                {
                    dispenser.stack.push(id);
                }
            }
            Owner::PlateSlot { plate, slot } => {
                if let Some(p) = self.items.get_mut(&plate).and_then(|i| i.plate.as_mut()) {
                    p.occupy(slot, id);
                }
            }
        }

        debug!("{} replaced {} as {}", id, old, food);
        events.push(GameEvent::ItemSpawned {
            item: id,
            food: Some(food),
        });
        Ok(id)
    }

    /// Push a new plate onto a dispenser's stack.
    pub(crate) fn stack_plate(&mut self, container: ContainerId, events: &mut EventQueue) -> Result<usize> {
        self.require_container(container)?;
        let plate = self.spawn_plate(events);
        match &mut self.containers[container.0].station {
            Station::PlateDispenser(dispenser) => {
                dispenser.stack.push(plate);
                let count = dispenser.stack.len();
                if let Some(item) = self.items.get_mut(&plate) {
                    item.set_owner(Owner::Stack(container));
                }
                Ok(count)
            }
            _ => {
                self.items.remove(&plate);
                Err(KitchenError::InvariantViolation(format!(
                    "{} is not a plate dispenser",
                    container
                )))
            }
        }
    }

    /// Top of a dispenser's stack, if any.
    pub(crate) fn top_of_stack(&self, container: ContainerId) -> Option<ItemId> {
        self.container(container)
            .and_then(|c| c.dispenser())
            .and_then(|d| d.stack.last().copied())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Invariants
    // ─────────────────────────────────────────────────────────────────────

    /// Verify that every owner reference is mirrored by its back-reference.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(KitchenError::InvariantViolation(msg));

        for item in self.items.values() {
            let id = item.id;
            let mirrored = match item.owner() {
                Owner::Loose => true,
                Owner::Hand(actor) => self.held_by(actor) == Some(id),
                Owner::Container(c) => self.container(c).and_then(|c| c.held()) == Some(id),
                Owner::Stack(c) => self
                    .container(c)
                    .and_then(|c| c.dispenser())
                    .is_some_and(|d| d.stack.contains(&id)),
                Owner::PlateSlot { plate, slot } => self
                    .item(plate)
                    .and_then(|p| p.plate.as_ref())
                    .and_then(|p| p.slots().get(slot))
                    .and_then(|s| s.occupant)
                    == Some(id),
            };
            if !mirrored {
                return violation(format!("{} owner {:?} does not point back", id, item.owner()));
            }
        }

        for (i, hand) in self.hands.iter().enumerate() {
            if let Some(id) = hand {
                let actor = ActorId(i as u32);
                if self.item(*id).map(|item| item.owner()) != Some(Owner::Hand(actor)) {
                    return violation(format!("{} holds {} which is owned elsewhere", actor, id));
                }
            }
        }

        for container in &self.containers {
            if let Some(id) = container.held() {
                if self.item(id).map(|item| item.owner()) != Some(Owner::Container(container.id)) {
                    return violation(format!("{} holds {} which is owned elsewhere", container.id, id));
                }
            }
            if let Some(dispenser) = container.dispenser() {
                for id in &dispenser.stack {
                    if self.item(*id).map(|item| item.owner()) != Some(Owner::Stack(container.id)) {
                        return violation(format!("{} stacks stray {}", container.id, id));
                    }
                }
            }
        }

        for item in self.items.values() {
            let Some(plate) = &item.plate else { continue };
            for (slot, entry) in plate.slots().iter().enumerate() {
                if let Some(id) = entry.occupant {
                    let expected = Owner::PlateSlot {
                        plate: item.id,
                        slot,
                    };
                    if self.item(id).map(|occupant| occupant.owner()) != Some(expected) {
                        return violation(format!("{} slot {} holds stray {}", item.id, slot, id));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Kitchen, ActorId, EventQueue) {
        let mut kitchen = Kitchen::standard();
        let actor = kitchen.add_actor();
        (kitchen, actor, EventQueue::new())
    }

    #[test]
    fn test_pick_up_then_place() {
        let (mut kitchen, actor, mut events) = setup();
        let counter = kitchen.find_station(StationKind::Counter).unwrap();
        let bread = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();

        kitchen.pick_up(actor, bread, &mut events).unwrap();
        assert_eq!(kitchen.held_by(actor), Some(bread));

        kitchen.place_on(bread, counter, &mut events).unwrap();
        assert_eq!(kitchen.held_by(actor), None);
        assert_eq!(kitchen.container(counter).unwrap().held(), Some(bread));
        assert_eq!(kitchen.item(bread).unwrap().owner(), Owner::Container(counter));
        kitchen.check_invariants().unwrap();
    }

    #[test]
    fn test_place_on_delivery_and_trash_rejected() {
        let (mut kitchen, actor, mut events) = setup();
        let window = kitchen.find_station(StationKind::Delivery).unwrap();
        let trash = kitchen.find_station(StationKind::Trash).unwrap();
        let plate = kitchen.spawn_plate(&mut events);
        kitchen.pick_up(actor, plate, &mut events).unwrap();

        let err = kitchen.place_on(plate, window, &mut events).unwrap_err();
        assert!(matches!(err, KitchenError::NotAccepted { .. }));
        assert_eq!(kitchen.held_by(actor), Some(plate));

        let tomato = kitchen.spawn_food(FoodType::Tomato, &mut events).unwrap();
        let err = kitchen.place_on(tomato, trash, &mut events).unwrap_err();
        assert!(matches!(err, KitchenError::NotAccepted { .. }));
        assert_eq!(kitchen.item(tomato).unwrap().owner(), Owner::Loose);

        assert_eq!(kitchen.container(window).unwrap().held(), None);
        assert_eq!(kitchen.container(trash).unwrap().held(), None);
        kitchen.check_invariants().unwrap();
    }
    #[test]
    fn test_pick_up_rejected_when_hands_full() {
        let (mut kitchen, actor, mut events) = setup();
        let a = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();
        let b = kitchen.spawn_food(FoodType::Tomato, &mut events).unwrap();

        kitchen.pick_up(actor, a, &mut events).unwrap();
        let err = kitchen.pick_up(actor, b, &mut events).unwrap_err();
        assert!(matches!(err, KitchenError::HandsFull(_)));
    }

    #[test]
    fn test_pick_up_rejected_when_held_elsewhere() {
        let (mut kitchen, actor, mut events) = setup();
        let other = kitchen.add_actor();
        let bread = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();

        kitchen.pick_up(actor, bread, &mut events).unwrap();
        let err = kitchen.pick_up(other, bread, &mut events).unwrap_err();
        assert!(matches!(err, KitchenError::AlreadyHeld(_)));
        assert_eq!(kitchen.held_by(actor), Some(bread));
    }

    #[test]
    fn test_replace_keeps_container_binding() {
        let (mut kitchen, _actor, mut events) = setup();
        let board = kitchen.find_station(StationKind::CuttingBoard).unwrap();
        let tomato = kitchen.spawn_food(FoodType::Tomato, &mut events).unwrap();
        kitchen.place_on(tomato, board, &mut events).unwrap();

        let slice = kitchen
            .replace_item(tomato, FoodType::TomatoSlice, &mut events)
            .unwrap();
        assert!(kitchen.item(tomato).is_none());
        assert_eq!(kitchen.container(board).unwrap().held(), Some(slice));
        assert_eq!(kitchen.item(slice).unwrap().owner(), Owner::Container(board));
        kitchen.check_invariants().unwrap();
    }

    #[test]
    fn test_replace_without_template_keeps_original() {
        let mut catalog = FoodCatalog::standard();
        catalog.foods.retain(|spec| spec.food != FoodType::TomatoSlice);
        let mut kitchen = Kitchen::new(catalog, &default_layout());
        let mut events = EventQueue::new();
        let tomato = kitchen.spawn_food(FoodType::Tomato, &mut events).unwrap();

        let err = kitchen
            .replace_item(tomato, FoodType::TomatoSlice, &mut events)
            .unwrap_err();
        assert!(matches!(err, KitchenError::CatalogEntryMissing(_)));
        assert!(kitchen.item(tomato).is_some());
    }

    #[test]
    fn test_destroy_plate_takes_occupants() {
        let (mut kitchen, _actor, mut events) = setup();
        let plate = kitchen.spawn_plate(&mut events);
        let bread = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();
        kitchen.add_to_plate(plate, bread, &mut events).unwrap();

        kitchen.destroy(plate).unwrap();
        assert!(kitchen.item(plate).is_none());
        assert!(kitchen.item(bread).is_none());
    }

    #[test]
    fn test_remove_from_plate_leaves_item_loose() {
        let (mut kitchen, _actor, mut events) = setup();
        let plate = kitchen.spawn_plate(&mut events);
        let bread = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();
        kitchen.add_to_plate(plate, bread, &mut events).unwrap();

        let removed = kitchen
            .remove_from_plate(plate, PlateIngredient::Bread, &mut events)
            .unwrap();
        assert_eq!(removed, Some(bread));
        assert_eq!(kitchen.item(bread).unwrap().owner(), Owner::Loose);
        assert!(kitchen.plate_contents(plate).is_empty());
        kitchen.check_invariants().unwrap();
    }
}
