#[macro_use]
extern crate assert_float_eq;

use kitchen_rush_rs::kitchen::constants::default_layout;
use kitchen_rush_rs::kitchen::{Dispatcher, InteractionContext, Kitchen, Target, tick_stations};
use kitchen_rush_rs::models::{
    ActorId, ContainerId, FoodCatalog, FoodType, Item, ItemId, Owner, PlateIngredient, Recipe,
    StationConfig, StationKind, StationSpec,
};
use kitchen_rush_rs::state::{EventQueue, GameEvent, MenuConfig, RecipeBook};
use kitchen_rush_rs::{ErrorKind, KitchenError};

struct Fixture {
    kitchen: Kitchen,
    book: RecipeBook,
    events: EventQueue,
    actor: ActorId,
}

impl Fixture {
    fn with(kitchen: Kitchen, recipes: Vec<Recipe>) -> Self {
        let mut kitchen = kitchen;
        let actor = kitchen.add_actor();
        let mut book = RecipeBook::with_seed(recipes, MenuConfig::default(), 1).unwrap();
        let mut events = EventQueue::new();
        book.open(&mut events);
        Self {
            kitchen,
            book,
            events,
            actor,
        }
    }

    fn standard() -> Self {
        Self::with(Kitchen::standard(), vec![meat_sandwich()])
    }

    fn station(&self, kind: StationKind) -> ContainerId {
        self.kitchen.find_station(kind).unwrap()
    }

    fn interact(&mut self, target: Target) -> bool {
        let ctx = InteractionContext::new(&self.kitchen, self.actor, target);
        let mut dispatcher = Dispatcher::new(&mut self.kitchen, &mut self.book, &mut self.events);
        let handled = dispatcher.dispatch(&ctx);
        self.kitchen.check_invariants().unwrap();
        handled
    }

    fn use_station(&mut self, kind: StationKind) -> bool {
        let station = self.station(kind);
        self.interact(Target::Container(station))
    }

    fn cut(&mut self) -> bool {
        let board = self.station(StationKind::CuttingBoard);
        let mut dispatcher = Dispatcher::new(&mut self.kitchen, &mut self.book, &mut self.events);
        dispatcher.cut(Target::Container(board))
    }

    fn spawn(&mut self, food: FoodType) -> ItemId {
        self.kitchen.spawn_food(food, &mut self.events).unwrap()
    }

    fn give(&mut self, food: FoodType) -> ItemId {
        let item = self.spawn(food);
        self.kitchen.pick_up(self.actor, item, &mut self.events).unwrap();
        item
    }

    fn held(&self) -> Option<ItemId> {
        self.kitchen.held_by(self.actor)
    }
}

fn meat_sandwich() -> Recipe {
    Recipe::new(
        "meat-sandwich",
        "Roast Meat Sandwich",
        10,
        vec![PlateIngredient::Bread, PlateIngredient::CookedMeat],
    )
}

#[test]
fn test_owner_is_exclusive_across_transitions() {
    let mut f = Fixture::standard();
    let counter = f.station(StationKind::Counter);
    let bread = f.give(FoodType::Bread);
    assert_eq!(f.kitchen.item(bread).unwrap().owner(), Owner::Hand(f.actor));

    assert!(f.use_station(StationKind::Counter));
    assert_eq!(f.held(), None);
    assert_eq!(f.kitchen.item(bread).unwrap().owner(), Owner::Container(counter));

    let plate = f.kitchen.spawn_plate(&mut f.events);
    f.kitchen.pick_up(f.actor, plate, &mut f.events).unwrap();
    assert!(f.use_station(StationKind::Counter));
    let owner = f.kitchen.item(bread).unwrap().owner();
    assert!(matches!(owner, Owner::PlateSlot { plate: p, .. } if p == plate));
    assert_eq!(f.kitchen.container(counter).unwrap().held(), None);

    f.kitchen.drop_item(plate, (1.0, 0.0), &mut f.events).unwrap();
    assert_eq!(f.kitchen.item(plate).unwrap().owner(), Owner::Loose);
    assert_eq!(f.held(), None);
    f.kitchen.check_invariants().unwrap();
}

#[test]
fn test_empty_counter_receives_and_returns() {
    let mut f = Fixture::standard();
    let tomato = f.give(FoodType::Tomato);

    assert!(f.use_station(StationKind::Counter));
    assert_eq!(f.held(), None);

    assert!(f.use_station(StationKind::Counter));
    assert_eq!(f.held(), Some(tomato));
}

#[test]
fn test_occupied_counter_delegates_to_item() {
    let mut f = Fixture::standard();
    let counter = f.station(StationKind::Counter);
    let tomato = f.give(FoodType::Tomato);
    f.use_station(StationKind::Counter);
    let cheese = f.give(FoodType::Cheese);

    // Handled by the tomato, which has nothing to do with cheese.
    assert!(f.use_station(StationKind::Counter));
    assert_eq!(f.held(), Some(cheese));
    assert_eq!(f.kitchen.container(counter).unwrap().held(), Some(tomato));
}

#[test]
fn test_empty_counter_with_empty_hands_is_handled() {
    let mut f = Fixture::standard();
    assert!(f.use_station(StationKind::Counter));
    assert_eq!(f.held(), None);
}

#[test]
fn test_cutting_board_rejects_uncuttable() {
    let mut f = Fixture::standard();
    let bread = f.give(FoodType::Bread);

    assert!(!f.use_station(StationKind::CuttingBoard));
    assert_eq!(f.held(), Some(bread));
}

#[test]
fn test_supply_crate_hands_out_food() {
    let mut f = Fixture::standard();
    let crate_id = f.kitchen.supply_for(FoodType::Cabbage).unwrap();

    assert!(f.interact(Target::Container(crate_id)));
    let held = f.held().unwrap();
    assert_eq!(f.kitchen.item(held).unwrap().food, Some(FoodType::Cabbage));

    // Hands are full now.
    assert!(!f.interact(Target::Container(crate_id)));
    assert_eq!(f.kitchen.item_count(), 1);
}

#[test]
fn test_dispenser_scenario_caps_stack() {
    let layout = [StationSpec::new(
        "Rack",
        StationConfig::PlateDispenser {
            spawn_secs: 4.0,
            capacity: 2,
        },
    )];
    let mut kitchen = Kitchen::new(FoodCatalog::standard(), &layout);
    let mut events = EventQueue::new();
    let rack = ContainerId(0);
    let count = |k: &Kitchen| k.container(rack).unwrap().dispenser().unwrap().count();

    assert_eq!(count(&kitchen), 0);
    tick_stations(&mut kitchen, 4.0, &mut events);
    assert_eq!(count(&kitchen), 1);
    tick_stations(&mut kitchen, 4.0, &mut events);
    assert_eq!(count(&kitchen), 2);
    tick_stations(&mut kitchen, 4.0, &mut events);
    assert_eq!(count(&kitchen), 2);

    let spawned = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlateSpawned { .. }))
        .count();
    assert_eq!(spawned, 2);
}

#[test]
fn test_dispenser_pops_last_plate_first() {
    let mut f = Fixture::standard();
    let rack = f.station(StationKind::PlateDispenser);
    assert!(!f.use_station(StationKind::PlateDispenser));

    tick_stations(&mut f.kitchen, 4.0, &mut f.events);
    tick_stations(&mut f.kitchen, 4.0, &mut f.events);
    let newest = newest_plate(&f.kitchen, rack);

    assert!(f.use_station(StationKind::PlateDispenser));
    assert_eq!(f.held(), Some(newest));
    assert_eq!(f.kitchen.container(rack).unwrap().dispenser().unwrap().count(), 1);

    // Full hands cannot take another.
    assert!(!f.use_station(StationKind::PlateDispenser));
}

fn newest_plate(kitchen: &Kitchen, rack: ContainerId) -> ItemId {
    kitchen
        .items()
        .filter(|item| item.owner() == Owner::Stack(rack))
        .map(|item| item.id)
        .max()
        .unwrap()
}

#[test]
fn test_cut_bound_on_board() {
    let mut f = Fixture::standard();
    let board = f.station(StationKind::CuttingBoard);
    f.give(FoodType::Cabbage);
    assert!(f.use_station(StationKind::CuttingBoard));
    let cuts = f.kitchen.catalog().get(FoodType::Cabbage).unwrap().cut.unwrap().cuts;

    for stroke in 1..cuts {
        assert!(f.cut());
        assert_eq!(f.kitchen.food_on(board), Some(FoodType::Cabbage), "stroke {}", stroke);
    }
    assert!(f.cut());
    assert_eq!(f.kitchen.food_on(board), Some(FoodType::CabbageSlice));
    assert!(!f.cut());
    f.kitchen.check_invariants().unwrap();
}

#[test]
fn test_cutting_board_progress_hooks() {
    let mut f = Fixture::standard();
    let board = f.station(StationKind::CuttingBoard);
    f.give(FoodType::Tomato);
    f.events.drain();

    f.use_station(StationKind::CuttingBoard);
    assert!(f.events.iter().any(|e| *e
        == GameEvent::CuttingProgressChanged {
            container: board,
            progress: 0.0
        }));

    f.cut();
    f.events.drain();
    f.use_station(StationKind::CuttingBoard);
    assert!(
        f.events
            .iter()
            .any(|e| *e == GameEvent::CuttingProgressHidden { container: board })
    );
}

#[test]
fn test_cook_progress_is_monotonic_and_yields_once() {
    let catalog = FoodCatalog::standard();
    let mut meat = Item::from_spec(ItemId(1), catalog.get(FoodType::UncookedMeat).unwrap());
    let mut last = meat.cooking_progress();
    let mut yields = Vec::new();

    for _ in 0..20 {
        if let Some(food) = meat.cook(0.7) {
            yields.push(food);
        }
        assert!(meat.cooking_progress() >= last);
        last = meat.cooking_progress();
    }
    assert_eq!(yields, vec![FoodType::CookedMeat]);
    assert_float_absolute_eq!(meat.cooking_progress(), 1.0, 1e-9);
}

#[test]
fn test_stove_scenario_two_half_steps() {
    let mut f = Fixture::standard();
    let stove = f.station(StationKind::Stove);
    let cook_secs = f.kitchen.catalog().get(FoodType::UncookedMeat).unwrap().cook.unwrap().secs;
    assert_float_absolute_eq!(cook_secs, 5.0, 1e-9);

    f.give(FoodType::UncookedMeat);
    assert!(f.use_station(StationKind::Stove));

    tick_stations(&mut f.kitchen, 2.5, &mut f.events);
    assert_eq!(f.kitchen.food_on(stove), Some(FoodType::UncookedMeat));
    tick_stations(&mut f.kitchen, 2.5, &mut f.events);
    assert_eq!(f.kitchen.food_on(stove), Some(FoodType::CookedMeat));

    let progress: Vec<f64> = f
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::CookingProgressChanged { progress, .. } => Some(*progress),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 2);
    assert_float_absolute_eq!(progress[1], 1.0, 1e-9);
    f.kitchen.check_invariants().unwrap();
}

#[test]
fn test_plate_scenario_slots_and_duplicates() {
    let mut catalog = FoodCatalog::standard();
    catalog.plate.slots = vec![PlateIngredient::Bread, PlateIngredient::CheeseSlice];
    let mut kitchen = Kitchen::new(catalog, &[]);
    let mut events = EventQueue::new();
    let plate = kitchen.spawn_plate(&mut events);

    let tomato = kitchen.spawn_food(FoodType::TomatoSlice, &mut events).unwrap();
    let err = kitchen.add_to_plate(plate, tomato, &mut events).unwrap_err();
    assert!(matches!(err, KitchenError::NoFreeSlot(PlateIngredient::TomatoSlice)));
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert!(kitchen.plate_contents(plate).is_empty());

    let bread = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();
    kitchen.add_to_plate(plate, bread, &mut events).unwrap();

    let bread2 = kitchen.spawn_food(FoodType::Bread, &mut events).unwrap();
    let err = kitchen.add_to_plate(plate, bread2, &mut events).unwrap_err();
    assert!(matches!(err, KitchenError::DuplicateIngredient(PlateIngredient::Bread)));
    assert_eq!(kitchen.plate_contents(plate), vec![PlateIngredient::Bread]);
    assert_eq!(kitchen.item(bread2).unwrap().owner(), Owner::Loose);
    kitchen.check_invariants().unwrap();
}

#[test]
fn test_holding_plate_scoops_item_from_counter() {
    let mut f = Fixture::standard();
    let counter = f.station(StationKind::Counter);
    let bread = f.give(FoodType::Bread);
    f.use_station(StationKind::Counter);

    let plate = f.kitchen.spawn_plate(&mut f.events);
    f.kitchen.pick_up(f.actor, plate, &mut f.events).unwrap();

    assert!(f.use_station(StationKind::Counter));
    assert_eq!(f.held(), Some(plate));
    assert_eq!(f.kitchen.plate_contents(plate), vec![PlateIngredient::Bread]);
    assert_eq!(f.kitchen.container(counter).unwrap().held(), None);
    assert!(matches!(
        f.kitchen.item(bread).unwrap().owner(),
        Owner::PlateSlot { .. }
    ));
}

#[test]
fn test_loose_plate_targeted_directly() {
    let mut f = Fixture::standard();
    let plate = f.kitchen.spawn_plate(&mut f.events);
    let bread = f.give(FoodType::Bread);

    assert!(f.interact(Target::Item(plate)));
    assert_eq!(f.held(), None);
    assert_eq!(f.kitchen.plate_contents(plate), vec![PlateIngredient::Bread]);

    // Ingredients sitting on a plate are not targets of their own.
    assert!(!f.interact(Target::Item(bread)));

    assert!(f.interact(Target::Item(plate)));
    assert_eq!(f.held(), Some(plate));
}

#[test]
fn test_delivery_scenario_success() {
    let mut f = Fixture::standard();
    assert!(f.book.is_active("meat-sandwich"));

    let plate = f.kitchen.spawn_plate(&mut f.events);
    let bread = f.spawn(FoodType::Bread);
    let meat = f.spawn(FoodType::CookedMeat);
    f.kitchen.add_to_plate(plate, meat, &mut f.events).unwrap();
    f.kitchen.add_to_plate(plate, bread, &mut f.events).unwrap();
    f.kitchen.pick_up(f.actor, plate, &mut f.events).unwrap();
    f.events.drain();

    assert!(f.use_station(StationKind::Delivery));

    assert_eq!(f.held(), None);
    assert!(f.kitchen.item(plate).is_none());
    assert!(f.kitchen.item(bread).is_none());
    assert!(f.kitchen.item(meat).is_none());
    assert!(!f.book.is_active("meat-sandwich"));

    let events = f.events.drain();
    let price = events.iter().find_map(|e| match e {
        GameEvent::RecipeSuccess { price, recipe } => Some((*price, recipe.id.clone())),
        _ => None,
    });
    assert_eq!(price, Some((10, "meat-sandwich".to_string())));

    // The menu change is published before the success.
    let menu_at = events
        .iter()
        .position(|e| matches!(e, GameEvent::MenuUpdated { .. }))
        .unwrap();
    let success_at = events
        .iter()
        .position(|e| matches!(e, GameEvent::RecipeSuccess { .. }))
        .unwrap();
    assert!(menu_at < success_at);
}

#[test]
fn test_delivery_partial_plate_fails_and_keeps_plate() {
    let mut f = Fixture::standard();
    let plate = f.kitchen.spawn_plate(&mut f.events);
    let bread = f.spawn(FoodType::Bread);
    f.kitchen.add_to_plate(plate, bread, &mut f.events).unwrap();
    f.kitchen.pick_up(f.actor, plate, &mut f.events).unwrap();
    f.events.drain();

    assert!(!f.use_station(StationKind::Delivery));
    assert_eq!(f.held(), Some(plate));
    assert!(f.book.is_active("meat-sandwich"));
    assert_eq!(
        f.events.drain(),
        vec![GameEvent::RecipeFailed {
            ingredients: vec![PlateIngredient::Bread]
        }]
    );
}

#[test]
fn test_delivery_keeps_recipe_when_not_retiring() {
    let layout = [StationSpec::new(
        "Window",
        StationConfig::Delivery {
            retire_on_success: false,
        },
    )];
    let kitchen = Kitchen::new(FoodCatalog::standard(), &layout);
    let mut f = Fixture::with(kitchen, vec![meat_sandwich()]);
    let plate = f.kitchen.spawn_plate(&mut f.events);
    for food in [FoodType::Bread, FoodType::CookedMeat] {
        let item = f.spawn(food);
        f.kitchen.add_to_plate(plate, item, &mut f.events).unwrap();
    }
    f.kitchen.pick_up(f.actor, plate, &mut f.events).unwrap();

    assert!(f.use_station(StationKind::Delivery));
    assert!(f.book.is_active("meat-sandwich"));
}

#[test]
fn test_delivery_ignores_non_plates() {
    let mut f = Fixture::standard();
    let bread = f.give(FoodType::Bread);
    assert!(!f.use_station(StationKind::Delivery));
    assert_eq!(f.held(), Some(bread));
}

#[test]
fn test_trash_destroys_loaded_plate() {
    let mut f = Fixture::standard();
    let plate = f.kitchen.spawn_plate(&mut f.events);
    let bread = f.spawn(FoodType::Bread);
    f.kitchen.add_to_plate(plate, bread, &mut f.events).unwrap();
    f.kitchen.pick_up(f.actor, plate, &mut f.events).unwrap();

    assert!(f.use_station(StationKind::Trash));
    assert_eq!(f.held(), None);
    assert_eq!(f.kitchen.item_count(), 0);

    // Nothing in hand is still handled.
    assert!(f.use_station(StationKind::Trash));
}

#[test]
fn test_trash_refuses_untrashable() {
    let mut catalog = FoodCatalog::standard();
    for spec in catalog.foods.iter_mut().filter(|s| s.food == FoodType::Bread) {
        spec.trashable = false;
    }
    let mut f = Fixture::with(Kitchen::new(catalog, &default_layout()), vec![meat_sandwich()]);
    let bread = f.give(FoodType::Bread);

    assert!(!f.use_station(StationKind::Trash));
    assert_eq!(f.held(), Some(bread));
}
