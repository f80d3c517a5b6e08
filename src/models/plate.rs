use crate::models::{ItemId, PlateIngredient};

/// One typed position on a plate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateSlot {
    pub accepts: PlateIngredient,
    pub occupant: Option<ItemId>,
}

/// The slot table carried by a plate item.
///
/// Only bookkeeping lives here; moving items in and out goes through the
/// kitchen so that item owners stay in step with the slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    slots: Vec<PlateSlot>,
}

impl Plate {
    pub fn new(accepted: &[PlateIngredient]) -> Self {
        Self {
            slots: accepted
                .iter()
                .map(|&accepts| PlateSlot {
                    accepts,
                    occupant: None,
                })
                .collect(),
        }
    }

    pub fn slots(&self) -> &[PlateSlot] {
        &self.slots
    }

    /// Whether an occupied slot already carries this ingredient.
    pub fn holds(&self, ingredient: PlateIngredient) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.accepts == ingredient && slot.occupant.is_some())
    }

    /// First empty slot accepting the ingredient.
    pub fn free_slot_for(&self, ingredient: PlateIngredient) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.accepts == ingredient && slot.occupant.is_none())
    }

    pub fn has_slot_for(&self, ingredient: PlateIngredient) -> bool {
        self.slots.iter().any(|slot| slot.accepts == ingredient)
    }

    pub(crate) fn occupy(&mut self, slot: usize, item: ItemId) {
        if let Some(slot) = self.slots.get_mut(slot) {
            slot.occupant = Some(item);
        }
    }

    pub(crate) fn vacate_slot(&mut self, slot: usize) -> Option<ItemId> {
        self.slots.get_mut(slot).and_then(|slot| slot.occupant.take())
    }

    /// Index of the occupied slot carrying this ingredient.
    pub fn slot_of(&self, ingredient: PlateIngredient) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.accepts == ingredient && slot.occupant.is_some())
    }

    /// Snapshot of the ingredients currently on the plate, in slot order.
    pub fn occupied_ingredients(&self) -> Vec<PlateIngredient> {
        self.slots
            .iter()
            .filter(|slot| slot.occupant.is_some())
            .map(|slot| slot.accepts)
            .collect()
    }

    pub fn occupants(&self) -> Vec<ItemId> {
        self.slots.iter().filter_map(|slot| slot.occupant).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.occupant.is_none())
    }

    pub(crate) fn clear(&mut self) -> Vec<ItemId> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.occupant.take())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlateIngredient::*;

    #[test]
    fn test_free_slot_lookup() {
        let mut plate = Plate::new(&[Bread, CheeseSlice]);
        assert_eq!(plate.free_slot_for(Bread), Some(0));
        assert_eq!(plate.free_slot_for(TomatoSlice), None);

        plate.occupy(0, ItemId(7));
        assert!(plate.holds(Bread));
        assert_eq!(plate.free_slot_for(Bread), None);
        assert_eq!(plate.occupied_ingredients(), vec![Bread]);
    }

    #[test]
    fn test_clear_empties_every_slot() {
        let mut plate = Plate::new(&[Bread, CheeseSlice]);
        plate.occupy(0, ItemId(1));
        plate.occupy(1, ItemId(2));

        let removed = plate.clear();
        assert_eq!(removed, vec![ItemId(1), ItemId(2)]);
        assert!(plate.is_empty());
    }
}
