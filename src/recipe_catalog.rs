//! # Recipe Catalog
//!
//! The built-in recipe list plus any image-generated suggestions accepted at
//! runtime. Recipes without ingredients are never admitted, so every recipe in
//! a catalog has a well-defined compatibility score.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::recipe_model::{Difficulty, Recipe, RecipeSource};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// Build a catalog, dropping recipes that have no ingredients
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let mut catalog = Self::default();
        for recipe in recipes {
            catalog.push(recipe);
        }
        catalog
    }

    /// The fixed catalog shipped with the assistant
    pub fn builtin() -> Self {
        Self::new(builtin_recipes())
    }

    /// Append a recipe. Returns `false` (and logs) for ingredient-less recipes.
    pub fn push(&mut self, recipe: Recipe) -> bool {
        if recipe.ingredients.iter().all(|name| name.trim().is_empty()) {
            warn!("Excluding recipe '{}': it lists no ingredients", recipe.title);
            return false;
        }
        debug!("Catalog entry '{}' ({:?})", recipe.title, recipe.source);
        self.recipes.push(recipe);
        true
    }

    /// Accept a recipe suggested from a fridge photo
    pub fn push_generated(&mut self, mut recipe: Recipe) -> bool {
        recipe.source = RecipeSource::ImageGenerated;
        self.push(recipe)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Case-insensitive lookup by title
    pub fn find(&self, title: &str) -> Option<&Recipe> {
        let needle = title.trim().to_lowercase();
        self.recipes
            .iter()
            .find(|recipe| recipe.title.to_lowercase() == needle)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn recipe(
    title: &str,
    ingredients: &[&str],
    instructions: &[&str],
    prep_time: &str,
    cook_time: &str,
    servings: u32,
    difficulty: Difficulty,
    cuisine: &str,
    dietary_tags: &[&str],
) -> Recipe {
    Recipe {
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: instructions.iter().map(|s| s.to_string()).collect(),
        prep_time: prep_time.to_string(),
        cook_time: cook_time.to_string(),
        servings,
        difficulty,
        cuisine: cuisine.to_string(),
        dietary_tags: dietary_tags.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        source: RecipeSource::Catalog,
    }
}

fn builtin_recipes() -> Vec<Recipe> {
    vec![
        recipe(
            "Mediterranean Quinoa Bowl",
            &["quinoa", "cherry tomatoes", "cucumber", "olives", "feta cheese", "olive oil", "lemon"],
            &[
                "Cook quinoa according to package instructions",
                "Chop vegetables and mix with quinoa",
                "Add crumbled feta and drizzle with olive oil and lemon",
            ],
            "15 minutes",
            "20 minutes",
            2,
            Difficulty::Easy,
            "Mediterranean",
            &["vegetarian", "gluten-free"],
        ),
        recipe(
            "Vegan Buddha Bowl",
            &["brown rice", "sweet potato", "kale", "chickpeas", "avocado", "tahini", "sesame seeds"],
            &[
                "Cook brown rice and roast sweet potato cubes",
                "Massage kale with olive oil",
                "Assemble bowl with all ingredients and tahini dressing",
            ],
            "20 minutes",
            "30 minutes",
            2,
            Difficulty::Easy,
            "Asian",
            &["vegan", "gluten-free", "dairy-free"],
        ),
        recipe(
            "Keto Cauliflower Rice Stir-Fry",
            &["cauliflower", "chicken breast", "broccoli", "soy sauce", "ginger", "garlic", "eggs"],
            &[
                "Grate cauliflower into rice-like pieces",
                "Stir-fry chicken and vegetables",
                "Add cauliflower rice and scramble eggs",
            ],
            "10 minutes",
            "15 minutes",
            3,
            Difficulty::Medium,
            "Asian",
            &["gluten-free", "low-carb", "keto"],
        ),
        recipe(
            "Dairy-Free Pasta Primavera",
            &[
                "gluten-free pasta",
                "zucchini",
                "bell peppers",
                "cherry tomatoes",
                "olive oil",
                "basil",
                "nutritional yeast",
            ],
            &[
                "Cook gluten-free pasta",
                "Sauté vegetables in olive oil",
                "Toss with pasta and nutritional yeast",
            ],
            "10 minutes",
            "15 minutes",
            4,
            Difficulty::Easy,
            "Italian",
            &["dairy-free", "gluten-free"],
        ),
        recipe(
            "Low-Carb Zucchini Lasagna",
            &[
                "zucchini",
                "ground turkey",
                "marinara sauce",
                "ricotta cheese",
                "mozzarella",
                "parmesan",
                "basil",
            ],
            &[
                "Slice zucchini into thin strips",
                "Layer with turkey, sauce, and cheeses",
                "Bake until bubbly and golden",
            ],
            "20 minutes",
            "45 minutes",
            6,
            Difficulty::Medium,
            "Italian",
            &["low-carb", "gluten-free"],
        ),
        recipe(
            "Vegan Chocolate Avocado Mousse",
            &["avocado", "cocoa powder", "maple syrup", "vanilla extract", "almond milk", "berries"],
            &[
                "Blend avocado with cocoa and sweetener",
                "Add almond milk for creaminess",
                "Top with fresh berries",
            ],
            "10 minutes",
            "0 minutes",
            4,
            Difficulty::Easy,
            "Dessert",
            &["vegan", "dairy-free", "gluten-free"],
        ),
    ]
}
