use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KitchenError, Result};
use crate::kitchen::constants::{
    CABBAGE_CUTS, CHEESE_CUTS, MEAT_BURN_SECS, MEAT_COOK_SECS, TOMATO_CUTS,
};

/// Every kind of food that can exist in the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FoodType {
    Bread,
    Cheese,
    CheeseSlice,
    Tomato,
    TomatoSlice,
    Cabbage,
    CabbageSlice,
    UncookedMeat,
    CookedMeat,
    BurnedMeat,
}

impl FoodType {
    pub const ALL: [FoodType; 10] = [
        FoodType::Bread,
        FoodType::Cheese,
        FoodType::CheeseSlice,
        FoodType::Tomato,
        FoodType::TomatoSlice,
        FoodType::Cabbage,
        FoodType::CabbageSlice,
        FoodType::UncookedMeat,
        FoodType::CookedMeat,
        FoodType::BurnedMeat,
    ];

    /// The form this food takes once placed on a plate, if it has one.
    pub fn plate_form(self) -> Option<PlateIngredient> {
        match self {
            FoodType::Bread => Some(PlateIngredient::Bread),
            FoodType::CheeseSlice => Some(PlateIngredient::CheeseSlice),
            FoodType::TomatoSlice => Some(PlateIngredient::TomatoSlice),
            FoodType::CabbageSlice => Some(PlateIngredient::CabbageSlice),
            FoodType::CookedMeat => Some(PlateIngredient::CookedMeat),
            FoodType::BurnedMeat => Some(PlateIngredient::BurnedMeat),
            FoodType::Cheese | FoodType::Tomato | FoodType::Cabbage | FoodType::UncookedMeat => {
                None
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FoodType::Bread => "Bread",
            FoodType::Cheese => "Cheese",
            FoodType::CheeseSlice => "Cheese Slice",
            FoodType::Tomato => "Tomato",
            FoodType::TomatoSlice => "Tomato Slice",
            FoodType::Cabbage => "Cabbage",
            FoodType::CabbageSlice => "Cabbage Slice",
            FoodType::UncookedMeat => "Uncooked Meat",
            FoodType::CookedMeat => "Cooked Meat",
            FoodType::BurnedMeat => "Burned Meat",
        }
    }
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The subset of foods that may sit in a plate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlateIngredient {
    Bread,
    CheeseSlice,
    TomatoSlice,
    CabbageSlice,
    CookedMeat,
    BurnedMeat,
}

impl PlateIngredient {
    pub const ALL: [PlateIngredient; 6] = [
        PlateIngredient::Bread,
        PlateIngredient::CheeseSlice,
        PlateIngredient::TomatoSlice,
        PlateIngredient::CabbageSlice,
        PlateIngredient::CookedMeat,
        PlateIngredient::BurnedMeat,
    ];

    pub fn food_type(self) -> FoodType {
        match self {
            PlateIngredient::Bread => FoodType::Bread,
            PlateIngredient::CheeseSlice => FoodType::CheeseSlice,
            PlateIngredient::TomatoSlice => FoodType::TomatoSlice,
            PlateIngredient::CabbageSlice => FoodType::CabbageSlice,
            PlateIngredient::CookedMeat => FoodType::CookedMeat,
            PlateIngredient::BurnedMeat => FoodType::BurnedMeat,
        }
    }
}

impl From<PlateIngredient> for FoodType {
    fn from(ingredient: PlateIngredient) -> Self {
        ingredient.food_type()
    }
}

impl TryFrom<FoodType> for PlateIngredient {
    type Error = KitchenError;

    fn try_from(food: FoodType) -> Result<Self> {
        food.plate_form()
            .ok_or_else(|| KitchenError::InvalidInput(format!("{} has no plate form", food)))
    }
}

impl fmt::Display for PlateIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.food_type().name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutSpec {
    pub cuts: u32,
    pub result: FoodType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CookSpec {
    pub secs: f64,
    pub result: FoodType,
}

/// Spawn template for one food type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSpec {
    pub food: FoodType,

    /// Asset key for the icon shown on supply crates and menus.
    pub icon: String,

    #[serde(default)]
    pub cut: Option<CutSpec>,

    #[serde(default)]
    pub cook: Option<CookSpec>,

    #[serde(default)]
    pub plate_form: Option<PlateIngredient>,

    #[serde(default = "default_trashable")]
    pub trashable: bool,
}

fn default_trashable() -> bool {
    true
}

impl FoodSpec {
    fn raw(food: FoodType) -> Self {
        Self {
            food,
            icon: format!("icons/{}.png", food.name().to_lowercase().replace(' ', "_")),
            cut: None,
            cook: None,
            plate_form: food.plate_form(),
            trashable: true,
        }
    }

    fn with_cut(mut self, cuts: u32, result: FoodType) -> Self {
        self.cut = Some(CutSpec { cuts, result });
        self
    }

    fn with_cook(mut self, secs: f64, result: FoodType) -> Self {
        self.cook = Some(CookSpec { secs, result });
        self
    }
}

/// Layout of the slots on every plate handed out by a dispenser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateTemplate {
    pub icon: String,
    pub slots: Vec<PlateIngredient>,
}

impl Default for PlateTemplate {
    fn default() -> Self {
        Self {
            icon: "icons/plate.png".to_string(),
            slots: PlateIngredient::ALL.to_vec(),
        }
    }
}

/// A single processing step on the way from a raw food to a target food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepStep {
    Cut,
    Cook,
}

/// Static mapping from food type to its spawn template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCatalog {
    pub foods: Vec<FoodSpec>,

    #[serde(default)]
    pub plate: PlateTemplate,
}

impl Default for FoodCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl FoodCatalog {
    /// The foods of the sandwich kitchen.
    pub fn standard() -> Self {
        let foods = vec![
            FoodSpec::raw(FoodType::Bread),
            FoodSpec::raw(FoodType::Cheese).with_cut(CHEESE_CUTS, FoodType::CheeseSlice),
            FoodSpec::raw(FoodType::CheeseSlice),
            FoodSpec::raw(FoodType::Tomato).with_cut(TOMATO_CUTS, FoodType::TomatoSlice),
            FoodSpec::raw(FoodType::TomatoSlice),
            FoodSpec::raw(FoodType::Cabbage).with_cut(CABBAGE_CUTS, FoodType::CabbageSlice),
            FoodSpec::raw(FoodType::CabbageSlice),
            FoodSpec::raw(FoodType::UncookedMeat).with_cook(MEAT_COOK_SECS, FoodType::CookedMeat),
            FoodSpec::raw(FoodType::CookedMeat).with_cook(MEAT_BURN_SECS, FoodType::BurnedMeat),
            FoodSpec::raw(FoodType::BurnedMeat),
        ];
        Self {
            foods,
            plate: PlateTemplate::default(),
        }
    }

    pub fn get(&self, food: FoodType) -> Option<&FoodSpec> {
        self.foods.iter().find(|spec| spec.food == food)
    }

    pub fn icon(&self, food: FoodType) -> Option<&str> {
        self.get(food).map(|spec| spec.icon.as_str())
    }

    /// Check that templates are internally consistent.
    pub fn validate(&self) -> Result<()> {
        for spec in &self.foods {
            if let Some(form) = spec.plate_form {
                if form.food_type() != spec.food {
                    return Err(KitchenError::InvalidInput(format!(
                        "{} cannot take plate form {}",
                        spec.food, form
                    )));
                }
            }
            if let Some(cut) = spec.cut {
                if cut.cuts == 0 {
                    return Err(KitchenError::InvalidInput(format!(
                        "{} needs at least one cut",
                        spec.food
                    )));
                }
            }
            if let Some(cook) = spec.cook {
                if !(cook.secs > 0.0) {
                    return Err(KitchenError::InvalidInput(format!(
                        "{} has a non-positive cook time",
                        spec.food
                    )));
                }
            }
        }
        Ok(())
    }

    /// Find the raw food and the steps that turn it into `target`.
    ///
    /// A food that nothing produces is its own source with no steps.
    pub fn preparation(&self, target: FoodType) -> (FoodType, Vec<PrepStep>) {
        let mut steps = Vec::new();
        let mut current = target;

        // Each hop walks back one producer; the bound stops cyclic catalogs.
        for _ in 0..self.foods.len() {
            let producer = self.foods.iter().find_map(|spec| {
                if spec.cut.is_some_and(|c| c.result == current) {
                    Some((spec.food, PrepStep::Cut))
                } else if spec.cook.is_some_and(|c| c.result == current) {
                    Some((spec.food, PrepStep::Cook))
                } else {
                    None
                }
            });
            match producer {
                Some((source, step)) => {
                    steps.push(step);
                    current = source;
                }
                None => break,
            }
        }

        steps.reverse();
        (current, steps)
    }
}
