use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ContainerId, FoodSpec, FoodType, Plate, PlateIngredient, PlateTemplate};

/// Identity of an item; never reused within a kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Identity of an actor (a player's pair of hands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Who currently owns an item. Exactly one variant at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Free in the world, owned by physics.
    Loose,
    Hand(ActorId),
    Container(ContainerId),
    /// Waiting in a dispenser's stack.
    Stack(ContainerId),
    PlateSlot { plate: ItemId, slot: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuttable {
    pub cuts_required: u32,
    pub cuts_done: u32,
    pub result: FoodType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cookable {
    pub duration_secs: f64,
    /// Fraction cooked, in `[0, 1]`.
    pub progress: f64,
    pub result: FoodType,
    pub done: bool,
}

/// Anything that can be picked up: an ingredient or a plate.
///
/// Behaviour is composed from optional capability records rather than a
/// type hierarchy; callers check for presence.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub food: Option<FoodType>,
    owner: Owner,
    pub cuttable: Option<Cuttable>,
    pub cookable: Option<Cookable>,
    pub plateable: Option<PlateIngredient>,
    pub trashable: bool,
    pub plate: Option<Plate>,
}

impl Item {
    /// A bare item with no capabilities.
    pub fn new(id: ItemId, food: Option<FoodType>) -> Self {
        Self {
            id,
            food,
            owner: Owner::Loose,
            cuttable: None,
            cookable: None,
            plateable: None,
            trashable: false,
            plate: None,
        }
    }

    pub fn from_spec(id: ItemId, spec: &FoodSpec) -> Self {
        let mut item = Self::new(id, Some(spec.food));
        item.cuttable = spec.cut.map(|cut| Cuttable {
            cuts_required: cut.cuts,
            cuts_done: 0,
            result: cut.result,
        });
        item.cookable = spec.cook.map(|cook| Cookable {
            duration_secs: cook.secs,
            progress: 0.0,
            result: cook.result,
            done: false,
        });
        item.plateable = spec.plate_form;
        item.trashable = spec.trashable;
        item
    }

    pub fn new_plate(id: ItemId, template: &PlateTemplate) -> Self {
        let mut item = Self::new(id, None);
        item.plate = Some(Plate::new(&template.slots));
        item.trashable = true;
        item
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Only the kitchen moves items between owners, keeping both sides in step.
    pub(crate) fn set_owner(&mut self, owner: Owner) {
        self.owner = owner;
    }

    pub fn held_by(&self) -> Option<ActorId> {
        match self.owner {
            Owner::Hand(actor) => Some(actor),
            _ => None,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held_by().is_some()
    }

    pub fn is_plate(&self) -> bool {
        self.plate.is_some()
    }

    pub fn can_be_cut(&self) -> bool {
        self.cuttable
            .is_some_and(|cut| cut.cuts_done < cut.cuts_required)
    }

    pub fn can_be_cooked(&self) -> bool {
        self.cookable.is_some_and(|cook| !cook.done)
    }

    /// Advance cutting by one stroke.
    ///
    /// Returns the produced food only on the stroke that completes the cut;
    /// calls on an item that cannot be cut are no-ops.
    pub fn cut(&mut self) -> Option<FoodType> {
        let cut = self.cuttable.as_mut()?;
        if cut.cuts_done >= cut.cuts_required {
            return None;
        }
        cut.cuts_done += 1;
        (cut.cuts_done == cut.cuts_required).then_some(cut.result)
    }

    pub fn cutting_progress(&self) -> f64 {
        match self.cuttable {
            Some(cut) if cut.cuts_required > 0 => cut.cuts_done as f64 / cut.cuts_required as f64,
            _ => 0.0,
        }
    }

    /// Advance cooking by `delta_secs`.
    ///
    /// Returns the produced food exactly once, on the tick that reaches full
    /// progress. Negative deltas count as zero.
    pub fn cook(&mut self, delta_secs: f64) -> Option<FoodType> {
        let cook = self.cookable.as_mut()?;
        if cook.done {
            return None;
        }

        if cook.duration_secs > 0.0 {
            cook.progress += delta_secs.max(0.0) / cook.duration_secs;
        } else {
            cook.progress = 1.0;
        }

        if cook.progress >= 1.0 {
            cook.progress = 1.0;
            cook.done = true;
            return Some(cook.result);
        }
        None
    }

    pub fn cooking_progress(&self) -> f64 {
        self.cookable.map(|cook| cook.progress).unwrap_or(0.0)
    }

    /// Seconds of cooking still needed; zero when done or not cookable.
    pub fn cook_remaining_secs(&self) -> f64 {
        match self.cookable {
            Some(cook) if !cook.done => ((1.0 - cook.progress) * cook.duration_secs).max(0.0),
            _ => 0.0,
        }
    }

    pub fn label(&self) -> String {
        match (self.food, &self.plate) {
            (Some(food), _) => food.name().to_string(),
            (None, Some(plate)) if plate.is_empty() => "Plate".to_string(),
            (None, Some(plate)) => {
                let names: Vec<String> = plate
                    .occupied_ingredients()
                    .iter()
                    .map(|i| i.to_string())
                    .collect();
                format!("Plate [{}]", names.join(", "))
            }
            (None, None) => format!("{}", self.id),
        }
    }
}
