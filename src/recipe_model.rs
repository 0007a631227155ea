//! # Recipe Data Model
//!
//! Recipes are read-only catalog entries. Their compatibility score is never
//! stored on the recipe itself; it travels on [`RankedRecipe`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Where a recipe came from, which decides how its card is badged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecipeSource {
    /// Built-in catalog entry, shown with its compatibility score
    #[default]
    Catalog,
    /// Suggested from a fridge photo, shown with its dietary tags
    ImageGenerated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub cuisine: String,
    pub dietary_tags: BTreeSet<String>,
    #[serde(default)]
    pub source: RecipeSource,
}

/// A recipe annotated with its score for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecipe {
    pub recipe: Recipe,
    /// Percentage of the recipe's ingredients found in the fridge (0-100)
    pub compatibility_score: f64,
}

/// What a recipe card displays next to the title
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeBadge {
    Compatibility(u32),
    DietaryTags(Vec<String>),
}

impl Recipe {
    /// Check whether the recipe carries every tag in `restrictions`
    pub fn satisfies(&self, restrictions: &BTreeSet<String>) -> bool {
        restrictions.is_subset(&self.dietary_tags)
    }
}

impl RankedRecipe {
    pub fn badge(&self) -> RecipeBadge {
        match self.recipe.source {
            RecipeSource::Catalog => {
                RecipeBadge::Compatibility(self.compatibility_score.round() as u32)
            }
            RecipeSource::ImageGenerated => RecipeBadge::DietaryTags(
                self.recipe.dietary_tags.iter().map(|tag| display_tag(tag)).collect(),
            ),
        }
    }
}

/// "gluten-free" -> "gluten free" (first hyphen only, as the tag chips render it)
pub fn display_tag(tag: &str) -> String {
    tag.replacen('-', " ", 1)
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, prep {}, cook {}, serves {})",
            self.title, self.cuisine, self.difficulty, self.prep_time, self.cook_time, self.servings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tag_replaces_first_hyphen_only() {
        assert_eq!(display_tag("gluten-free"), "gluten free");
        assert_eq!(display_tag("low-carb-ish"), "low carb-ish");
        assert_eq!(display_tag("vegan"), "vegan");
    }
}
