//! # Shopping List Reconciler
//!
//! Turns the ingredients a recipe still needs into `needed` entries.

use tracing::info;

use crate::compatibility::is_available;
use crate::ingredient_model::{Category, Ingredient, Source};
use crate::ingredient_store::IngredientStore;
use crate::recipe_model::Recipe;

pub const SUGGESTED_QUANTITY: &str = "1";

/// Recipe ingredients not covered by the fridge, in recipe order
pub fn missing_for(recipe: &Recipe, fridge_names: &[String]) -> Vec<String> {
    recipe
        .ingredients
        .iter()
        .filter(|ingredient| !is_available(ingredient, fridge_names))
        .cloned()
        .collect()
}

/// Add every missing ingredient of `recipe` to the shopping list
///
/// Goes through the store's deduplicating `add`, so repeating the call (or
/// calling it for recipes that share ingredients) never duplicates entries.
/// Returns how many entries were inserted.
pub fn append_missing(store: &mut IngredientStore, recipe: &Recipe) -> usize {
    let missing = missing_for(recipe, &store.fridge_names());

    let mut added = 0;
    for name in &missing {
        let ingredient = Ingredient::new(name, SUGGESTED_QUANTITY, Category::Needed, Source::Suggestion);
        if store.add(ingredient) {
            added += 1;
        }
    }

    info!(
        "'{}': {} missing ingredient(s), {} added to shopping list",
        recipe.title,
        missing.len(),
        added
    );
    added
}
