//! # Ingredient Store
//!
//! In-memory ingredient collection split into the `fridge` and `needed`
//! partitions. Names are unique per partition, compared case-insensitively.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ingredient_model::{Category, Ingredient};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientStore {
    fridge: Vec<Ingredient>,
    needed: Vec<Ingredient>,
}

impl IngredientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an ingredient into its category partition
    ///
    /// Blank names are ignored, and so is any name already present in the
    /// target partition (case-insensitive). Returns `true` when inserted.
    pub fn add(&mut self, ingredient: Ingredient) -> bool {
        if ingredient.has_blank_name() {
            debug!("Ignoring ingredient with blank name");
            return false;
        }

        if self.contains_name(ingredient.category, &ingredient.name) {
            debug!(
                "Ignoring duplicate '{}' in {} partition",
                ingredient.name, ingredient.category
            );
            return false;
        }

        debug!(
            "Adding '{}' to {} (source: {})",
            ingredient.name, ingredient.category, ingredient.source
        );
        self.partition_mut(ingredient.category).push(ingredient);
        true
    }

    /// Remove an ingredient by id from a partition. Returns `true` if found.
    pub fn remove(&mut self, id: &str, category: Category) -> bool {
        let partition = self.partition_mut(category);
        let before = partition.len();
        partition.retain(|item| item.id != id);
        let removed = partition.len() != before;

        if removed {
            debug!("Removed ingredient {} from {}", id, category);
        }
        removed
    }

    /// Ingredients of a partition, in insertion order
    pub fn list(&self, category: Category) -> &[Ingredient] {
        match category {
            Category::Fridge => &self.fridge,
            Category::Needed => &self.needed,
        }
    }

    /// Clear both partitions
    pub fn reset(&mut self) {
        info!(
            "Resetting ingredient store ({} fridge, {} needed)",
            self.fridge.len(),
            self.needed.len()
        );
        self.fridge.clear();
        self.needed.clear();
    }

    /// Case-insensitive name lookup within a partition
    pub fn contains_name(&self, category: Category, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.list(category)
            .iter()
            .any(|item| item.normalized_name() == needle)
    }

    /// Names of everything in the fridge, used by scoring and reconciliation
    pub fn fridge_names(&self) -> Vec<String> {
        self.fridge.iter().map(|item| item.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fridge.len() + self.needed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fridge.is_empty() && self.needed.is_empty()
    }

    fn partition_mut(&mut self, category: Category) -> &mut Vec<Ingredient> {
        match category {
            Category::Fridge => &mut self.fridge,
            Category::Needed => &mut self.needed,
        }
    }
}
