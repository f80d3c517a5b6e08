use serde::{Deserialize, Serialize};

use crate::error::{KitchenError, Result};
use crate::models::PlateIngredient;

/// A dish on the menu: the exact ingredients a plate must carry, and its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub price: u32,

    pub ingredients: Vec<PlateIngredient>,
}

impl Recipe {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: u32,
        ingredients: Vec<PlateIngredient>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            ingredients,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Multiset equality: same ingredients with the same counts, order ignored.
    pub fn matches(&self, provided: &[PlateIngredient]) -> bool {
        if provided.len() != self.ingredients.len() {
            return false;
        }
        let mut wanted = self.ingredients.clone();
        let mut given = provided.to_vec();
        wanted.sort();
        given.sort();
        wanted == given
    }

    /// True when the same ingredient appears more than once.
    pub fn has_duplicate_ingredients(&self) -> bool {
        let mut sorted = self.ingredients.clone();
        sorted.sort();
        sorted.windows(2).any(|pair| pair[0] == pair[1])
    }

    /// Description followed by the required ingredient list.
    pub fn full_description(&self) -> String {
        let mut desc = self.description.clone();
        desc.push_str("\n\nIngredients:\n");
        for ingredient in &self.ingredients {
            desc.push_str(&format!("- {}\n", ingredient));
        }
        desc
    }
}

/// Reject catalogs no plate could ever satisfy.
///
/// Plates hold at most one of each ingredient, so a recipe listing the same
/// ingredient twice would stay on the menu forever.
pub fn validate_recipes(recipes: &[Recipe]) -> Result<()> {
    let mut seen_ids = std::collections::HashSet::new();
    for recipe in recipes {
        if !seen_ids.insert(recipe.id.as_str()) {
            return Err(KitchenError::InvalidInput(format!(
                "duplicate recipe id {}",
                recipe.id
            )));
        }
        if recipe.ingredients.is_empty() {
            return Err(KitchenError::InvalidInput(format!(
                "recipe {} has no ingredients",
                recipe.id
            )));
        }
        if recipe.has_duplicate_ingredients() {
            return Err(KitchenError::InvalidInput(format!(
                "recipe {} lists an ingredient twice",
                recipe.id
            )));
        }
    }
    Ok(())
}

/// The sandwich and burger menu of the standard kitchen.
pub fn standard_recipes() -> Vec<Recipe> {
    use PlateIngredient::*;

    vec![
        Recipe::new("cheese-sandwich", "Classic Cheese Sandwich", 8, vec![Bread, CheeseSlice])
            .with_description("Soft bread with rich cheese. Simple and good."),
        Recipe::new("tomato-sandwich", "Fresh Tomato Sandwich", 7, vec![Bread, TomatoSlice])
            .with_description("Fresh tomato on bread, light and crisp."),
        Recipe::new("veggie-sandwich", "Green Veggie Sandwich", 7, vec![Bread, CabbageSlice])
            .with_description("Fresh cabbage and bread."),
        Recipe::new("meat-sandwich", "Roast Meat Sandwich", 10, vec![Bread, CookedMeat])
            .with_description("Juicy meat slices on bread."),
        Recipe::new("charred-sandwich", "Charred Sandwich", 9, vec![Bread, BurnedMeat])
            .with_description("Slightly scorched meat with a smoky edge."),
        Recipe::new(
            "cheese-tomato-sandwich",
            "Cheese and Tomato Sandwich",
            12,
            vec![Bread, CheeseSlice, TomatoSlice],
        )
        .with_description("The classic pairing."),
        Recipe::new(
            "cheese-veggie-sandwich",
            "Cheese and Veggie Sandwich",
            11,
            vec![Bread, CheeseSlice, CabbageSlice],
        )
        .with_description("Cheese with crunchy cabbage."),
        Recipe::new(
            "cheese-meat-sandwich",
            "Cheese and Meat Sandwich",
            15,
            vec![Bread, CheeseSlice, CookedMeat],
        )
        .with_description("Rich cheese over juicy meat."),
        Recipe::new(
            "garden-sandwich",
            "Garden Sandwich",
            10,
            vec![Bread, TomatoSlice, CabbageSlice],
        )
        .with_description("Tomato and cabbage, the healthy pick."),
        Recipe::new(
            "tomato-meat-sandwich",
            "Tomato and Meat Sandwich",
            14,
            vec![Bread, TomatoSlice, CookedMeat],
        )
        .with_description("Sweet tomato against savoury meat."),
        Recipe::new(
            "veggie-meat-sandwich",
            "Veggie and Meat Sandwich",
            13,
            vec![Bread, CabbageSlice, CookedMeat],
        )
        .with_description("Crisp greens and tender meat."),
        Recipe::new(
            "super-cheese-meat",
            "Super Cheese Meat Sandwich",
            18,
            vec![Bread, CheeseSlice, TomatoSlice, CookedMeat],
        )
        .with_description("Cheese, tomato and meat stacked high."),
        Recipe::new(
            "farm-sandwich",
            "Farmhouse Sandwich",
            17,
            vec![Bread, CheeseSlice, CabbageSlice, CookedMeat],
        )
        .with_description("Cheese, greens and meat in balance."),
        Recipe::new(
            "classic-burger",
            "Classic Burger",
            16,
            vec![Bread, TomatoSlice, CabbageSlice, CookedMeat],
        )
        .with_description("Tomato, cabbage and a patty."),
        Recipe::new(
            "deluxe-cheeseburger",
            "Deluxe Cheeseburger",
            20,
            vec![Bread, CheeseSlice, TomatoSlice, CabbageSlice, CookedMeat],
        )
        .with_description("Everything but the burned meat."),
        Recipe::new(
            "big-meat-burger",
            "Big Meat Burger",
            22,
            vec![Bread, CookedMeat, CabbageSlice],
        )
        .with_description("Built for the hungry."),
        Recipe::new(
            "double-cheeseburger",
            "Double Cheeseburger",
            16,
            vec![Bread, CheeseSlice, CookedMeat],
        )
        .with_description("Twice the cheese."),
        Recipe::new(
            "vegetarian-delight",
            "Vegetarian Delight",
            14,
            vec![Bread, CheeseSlice, TomatoSlice, CabbageSlice],
        )
        .with_description("A balanced meat-free stack."),
        Recipe::new(
            "charred-special",
            "Charred Special",
            16,
            vec![Bread, BurnedMeat, CheeseSlice, TomatoSlice],
        )
        .with_description("Smoky meat with cheese and tomato."),
        Recipe::new(
            "chefs-tower",
            "Chef's Tower Burger",
            25,
            vec![Bread, CheeseSlice, TomatoSlice, CabbageSlice, CookedMeat],
        )
        .with_description("Every topping we have."),
    ]
}
