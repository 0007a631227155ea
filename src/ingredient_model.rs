//! # Ingredient Data Model
//!
//! This module defines the ingredient entries held by the kitchen assistant.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: a named, free-text quantified food item
//! - **Category**: which partition the item lives in (`fridge` or `needed`)
//! - **Source**: how the entry was created (provenance only, display purposes)
//!
//! ## Usage
//!
//! ```rust
//! use healthybot::ingredient_model::{Category, Ingredient, Source};
//!
//! let milk = Ingredient::new("Milk", "1 gallon", Category::Fridge, Source::Manual);
//! assert_eq!(milk.normalized_name(), "milk");
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Partition an ingredient belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Already available at home
    Fridge,
    /// On the shopping list
    Needed,
}

/// Provenance of an ingredient entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Manual,
    Image,
    Detected,
    Suggestion,
}

/// An ingredient entry; identity (`id`, `name`, `quantity`) is fixed at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Unique identifier assigned at creation
    pub id: String,

    /// Display name, trimmed (e.g., "cherry tomatoes")
    pub name: String,

    /// Free-text quantity (e.g., "2 medium", "1 cup")
    pub quantity: String,

    pub category: Category,

    pub source: Source,
}

impl Ingredient {
    /// Create a new ingredient with a fresh identifier
    pub fn new(name: &str, quantity: &str, category: Category, source: Source) -> Self {
        Self {
            id: next_id(),
            name: name.trim().to_string(),
            quantity: quantity.trim().to_string(),
            category,
            source,
        }
    }

    /// Name used for case-insensitive comparisons
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Check if the name is empty or whitespace-only
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// `<unix-millis>-<sequence>`; the sequence keeps ids unique within a process
fn next_id() -> String {
    let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", Utc::now().timestamp_millis(), sequence)
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Fridge => write!(f, "fridge"),
            Category::Needed => write!(f, "needed"),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Manual => write!(f, "manual"),
            Source::Image => write!(f, "image"),
            Source::Detected => write!(f, "detected"),
            Source::Suggestion => write!(f, "suggestion"),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quantity.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.quantity)
        }
    }
}
