//! # Recipe Compatibility Engine
//!
//! Scores recipes against the fridge and filters them by dietary restrictions.
//!
//! A recipe ingredient is *available* when it and some fridge ingredient
//! contain one another, ignoring case ("chicken" matches "chicken breast"
//! and vice versa).

use std::collections::BTreeSet;
use tracing::{debug, info, trace};

use crate::recipe_model::{RankedRecipe, Recipe};

/// Recipes must score strictly above this percentage to be suggested
pub const MIN_COMPATIBILITY_SCORE: f64 = 30.0;

/// Bidirectional, case-insensitive substring match. Blank names never match.
pub fn names_match(recipe_ingredient: &str, fridge_ingredient: &str) -> bool {
    let wanted = recipe_ingredient.trim().to_lowercase();
    let available = fridge_ingredient.trim().to_lowercase();

    if wanted.is_empty() || available.is_empty() {
        return false;
    }
    wanted.contains(&available) || available.contains(&wanted)
}

/// Check whether any fridge ingredient satisfies `recipe_ingredient`
pub fn is_available(recipe_ingredient: &str, fridge_names: &[String]) -> bool {
    fridge_names
        .iter()
        .any(|available| names_match(recipe_ingredient, available))
}

/// Percentage of the recipe's ingredients available in the fridge
///
/// Recipes without ingredients score 0.
pub fn score(recipe: &Recipe, fridge_names: &[String]) -> f64 {
    let total = recipe.ingredients.len();
    if total == 0 {
        return 0.0;
    }

    let matched = recipe
        .ingredients
        .iter()
        .filter(|ingredient| is_available(ingredient, fridge_names))
        .count();

    let percentage = matched as f64 / total as f64 * 100.0;
    trace!("'{}' matched {}/{} -> {:.2}%", recipe.title, matched, total, percentage);
    percentage
}

/// Score, filter and rank recipes
///
/// Keeps recipes scoring above [`MIN_COMPATIBILITY_SCORE`] whose tags include
/// every restriction, sorted by descending score. Equal scores keep catalog
/// order.
pub fn filter(
    recipes: &[Recipe],
    fridge_names: &[String],
    restrictions: &BTreeSet<String>,
) -> Vec<RankedRecipe> {
    let mut ranked: Vec<RankedRecipe> = recipes
        .iter()
        .map(|recipe| RankedRecipe {
            compatibility_score: score(recipe, fridge_names),
            recipe: recipe.clone(),
        })
        .filter(|ranked| ranked.compatibility_score > MIN_COMPATIBILITY_SCORE)
        .filter(|ranked| ranked.recipe.satisfies(restrictions))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.compatibility_score.total_cmp(&a.compatibility_score));

    info!(
        "{} of {} recipes compatible with {} fridge item(s) and {} restriction(s)",
        ranked.len(),
        recipes.len(),
        fridge_names.len(),
        restrictions.len()
    );
    ranked
}

/// Diet-only listing in catalog order, regardless of fridge contents
pub fn filter_by_diet<'a>(recipes: &'a [Recipe], restrictions: &BTreeSet<String>) -> Vec<&'a Recipe> {
    let matching: Vec<&Recipe> = recipes
        .iter()
        .filter(|recipe| recipe.satisfies(restrictions))
        .collect();
    debug!("{} recipes satisfy {:?}", matching.len(), restrictions);
    matching
}

/// Each recipe ingredient paired with whether the fridge covers it
pub fn ingredient_availability(recipe: &Recipe, fridge_names: &[String]) -> Vec<(String, bool)> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| (ingredient.clone(), is_available(ingredient, fridge_names)))
        .collect()
}
