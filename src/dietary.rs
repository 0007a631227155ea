//! Dietary onboarding module for the once-per-session restrictions modal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Restrictions offered by the onboarding modal
pub const DIETARY_OPTIONS: &[&str] = &[
    "vegetarian",
    "vegan",
    "gluten-free",
    "dairy-free",
    "low-carb",
    "keto",
];

/// Check whether a restriction is one the modal offers (case-insensitive)
pub fn is_known_restriction(restriction: &str) -> bool {
    let wanted = restriction.trim().to_lowercase();
    DIETARY_OPTIONS.iter().any(|option| *option == wanted)
}

/// Represents where the user is in the onboarding flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnboardingPhase {
    #[default]
    Unset,
    ShowingModal,
    Confirmed,
}

/// Onboarding state and the selections it collects
///
/// Selections survive closing and reopening the modal. The restrictions in
/// effect are the selections at the last confirmation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryOnboarding {
    phase: OnboardingPhase,
    selections: BTreeSet<String>,
    confirmed: BTreeSet<String>,
}

impl DietaryOnboarding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> OnboardingPhase {
        self.phase
    }

    /// Show the modal. Returns `false` if it is already showing.
    pub fn open(&mut self) -> bool {
        match self.phase {
            OnboardingPhase::Unset | OnboardingPhase::Confirmed => {
                debug!("Opening dietary modal from {:?}", self.phase);
                self.phase = OnboardingPhase::ShowingModal;
                true
            }
            OnboardingPhase::ShowingModal => false,
        }
    }

    /// Flip a restriction while the modal is showing. Returns whether the
    /// restriction is now selected.
    pub fn toggle(&mut self, restriction: &str) -> bool {
        let restriction = restriction.trim().to_lowercase();
        if self.phase != OnboardingPhase::ShowingModal {
            debug!("Ignoring toggle of '{}' outside the modal", restriction);
            return self.selections.contains(&restriction);
        }

        if self.selections.remove(&restriction) {
            false
        } else {
            self.selections.insert(restriction);
            true
        }
    }

    /// Close the modal and apply the selections. Returns the new restriction
    /// set, or `None` when the modal was not showing.
    pub fn confirm(&mut self) -> Option<&BTreeSet<String>> {
        if self.phase != OnboardingPhase::ShowingModal {
            return None;
        }

        self.phase = OnboardingPhase::Confirmed;
        self.confirmed = self.selections.clone();
        info!("Dietary restrictions confirmed: {:?}", self.confirmed);
        Some(&self.confirmed)
    }

    /// Selections currently ticked in the modal
    pub fn selections(&self) -> &BTreeSet<String> {
        &self.selections
    }

    /// Restrictions in effect for recipe filtering
    pub fn restrictions(&self) -> &BTreeSet<String> {
        &self.confirmed
    }
}
