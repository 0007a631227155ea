//! # Application State
//!
//! The single writer for everything the kitchen assistant shows: the ingredient
//! store, dietary onboarding, ranked recipes, the selected recipe, image
//! previews and chat history.
//!
//! Every fridge change and every confirmed restriction change recomputes the
//! full recipe ranking. Network-driven mutations (image analysis, chat) are
//! applied only after the call has fully succeeded, so a failure leaves the
//! state exactly as it was.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::compatibility;
use crate::config::AppConfig;
use crate::dietary::{DietaryOnboarding, OnboardingPhase};
use crate::errors::AppError;
use crate::image_queue::ImageQueue;
use crate::ingredient_model::{Category, Ingredient, Source};
use crate::ingredient_store::IngredientStore;
use crate::localization::{t_args_lang, t_lang};
use crate::proxy_client::ProxyClient;
use crate::recipe_catalog::RecipeCatalog;
use crate::recipe_model::{RankedRecipe, Recipe};
use crate::shopping_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
}

/// What happened to one uploaded image
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Added { file_name: String, count: usize },
    AllDuplicates { file_name: String },
    NothingDetected { file_name: String },
    Failed { file_name: String, error: AppError },
}

/// Immutable view handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub fridge: Vec<Ingredient>,
    pub needed: Vec<Ingredient>,
    pub restrictions: BTreeSet<String>,
    pub onboarding_phase: OnboardingPhase,
    pub recipes: Vec<RankedRecipe>,
    pub selected_recipe: Option<String>,
    pub image_previews: Vec<String>,
    pub chat_history: Vec<ChatEntry>,
}

pub struct AppState {
    store: IngredientStore,
    catalog: RecipeCatalog,
    onboarding: DietaryOnboarding,
    recipe_results: Vec<RankedRecipe>,
    selected_recipe: Option<String>,
    image_previews: Vec<String>,
    chat_history: Vec<ChatEntry>,
    notices: Vec<String>,
    language: Option<String>,
    min_confidence: f64,
}

impl AppState {
    pub fn new(catalog: RecipeCatalog, config: &AppConfig) -> Self {
        Self {
            store: IngredientStore::new(),
            catalog,
            onboarding: DietaryOnboarding::new(),
            recipe_results: Vec::new(),
            selected_recipe: None,
            image_previews: Vec::new(),
            chat_history: Vec::new(),
            notices: Vec::new(),
            language: Some(config.language.clone()),
            min_confidence: config.min_confidence,
        }
    }

    pub fn store(&self) -> &IngredientStore {
        &self.store
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn onboarding(&self) -> &DietaryOnboarding {
        &self.onboarding
    }

    /// Ranked recipes from the latest recomputation
    pub fn recipes(&self) -> &[RankedRecipe] {
        &self.recipe_results
    }

    pub fn chat_history(&self) -> &[ChatEntry] {
        &self.chat_history
    }

    pub fn image_previews(&self) -> &[String] {
        &self.image_previews
    }

    /// Drain the localized notices produced since the last call
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Add an ingredient typed by the user
    ///
    /// Blank names are rejected with `InvalidInput`; duplicates return
    /// `Ok(false)` and leave a notice.
    pub fn add_manual(&mut self, name: &str, quantity: &str, category: Category) -> Result<bool, AppError> {
        if name.trim().is_empty() {
            self.notice(t_lang("error-empty-ingredient", self.lang()));
            return Err(AppError::InvalidInput("ingredient name is empty".to_string()));
        }

        let inserted = self
            .store
            .add(Ingredient::new(name, quantity, category, Source::Manual));

        if !inserted {
            self.notice(t_args_lang("ingredient-duplicate", &[("name", name.trim())], self.lang()));
        } else if category == Category::Fridge {
            self.recompute_recipes();
        }
        Ok(inserted)
    }

    /// Remove an ingredient by id
    pub fn remove(&mut self, id: &str, category: Category) -> bool {
        let removed = self.store.remove(id, category);
        if removed && category == Category::Fridge {
            self.recompute_recipes();
        }
        removed
    }

    pub fn open_dietary_modal(&mut self) -> bool {
        self.onboarding.open()
    }

    pub fn toggle_restriction(&mut self, restriction: &str) -> bool {
        self.onboarding.toggle(restriction)
    }

    /// Apply the modal selections. Returns `false` if the modal was not open.
    pub fn confirm_restrictions(&mut self) -> bool {
        if self.onboarding.confirm().is_none() {
            return false;
        }
        self.notice(t_lang("dietary-confirmed", self.lang()));
        self.recompute_recipes();
        true
    }

    /// Add an image-generated recipe to the catalog
    pub fn accept_generated_recipe(&mut self, recipe: Recipe) -> bool {
        let accepted = self.catalog.push_generated(recipe);
        if accepted {
            self.recompute_recipes();
        }
        accepted
    }

    /// Select a catalog recipe by title (case-insensitive)
    pub fn select_recipe(&mut self, title: &str) -> Option<&Recipe> {
        let recipe = self.catalog.find(title)?;
        self.selected_recipe = Some(recipe.title.clone());
        debug!("Selected recipe '{}'", recipe.title);
        Some(recipe)
    }

    pub fn selected_recipe(&self) -> Option<&Recipe> {
        self.selected_recipe
            .as_deref()
            .and_then(|title| self.catalog.find(title))
    }

    /// Put the selected recipe's missing ingredients on the shopping list
    pub fn add_missing_for_selected(&mut self) -> Option<usize> {
        let recipe = self.selected_recipe()?.clone();
        Some(self.add_missing_for(&recipe))
    }

    /// Put a recipe's missing ingredients on the shopping list
    pub fn add_missing_for(&mut self, recipe: &Recipe) -> usize {
        let added = shopping_list::append_missing(&mut self.store, recipe);
        let count = added.to_string();
        let notice = if added == 0 && shopping_list::missing_for(recipe, &self.store.fridge_names()).is_empty() {
            t_args_lang("shopping-nothing-missing", &[("recipe", recipe.title.as_str())], self.lang())
        } else {
            t_args_lang("shopping-added", &[("count", count.as_str())], self.lang())
        };
        self.notice(notice);
        added
    }

    /// Analyze queued images one at a time, in upload order
    ///
    /// Confident detections of each image are merged into the fridge before
    /// the next image is sent. A failed image leaves the state untouched and
    /// gets no preview.
    pub async fn process_uploads(&mut self, client: &ProxyClient, queue: &mut ImageQueue) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(queue.len());

        while let Some(image) = queue.pop_next() {
            let file_name = image.file_name.clone();

            let analysis = match client.analyze_image(&image).await {
                Ok(analysis) => {
                    self.image_previews.push(file_name.clone());
                    analysis
                }
                Err(error) => {
                    warn!("Analysis of {} failed: {}", file_name, error);
                    self.notice(self.error_notice(&error));
                    outcomes.push(UploadOutcome::Failed { file_name, error });
                    continue;
                }
            };

            let confident = analysis.confident(self.min_confidence);
            debug!(
                "{}: {} of {} detections above {:.2}",
                file_name,
                confident.len(),
                analysis.ingredients.len(),
                self.min_confidence
            );

            if confident.is_empty() {
                self.notice(t_lang("error-no-ingredients", self.lang()));
                outcomes.push(UploadOutcome::NothingDetected { file_name });
                continue;
            }

            let count = confident
                .iter()
                .map(|detected| Ingredient::new(&detected.name, &detected.quantity, Category::Fridge, Source::Image))
                .filter(|ingredient| self.store.add(ingredient.clone()))
                .count();

            if count == 0 {
                self.notice(t_args_lang("analysis-duplicates", &[("file", file_name.as_str())], self.lang()));
                outcomes.push(UploadOutcome::AllDuplicates { file_name });
                continue;
            }

            self.recompute_recipes();
            let added = count.to_string();
            self.notice(t_args_lang(
                "analysis-success",
                &[("count", added.as_str()), ("file", file_name.as_str())],
                self.lang(),
            ));
            outcomes.push(UploadOutcome::Added { file_name, count });
        }

        info!("Processed {} upload(s)", outcomes.len());
        outcomes
    }

    /// Ask the assistant; the exchange is recorded only if a reply arrives
    pub async fn send_chat(&mut self, client: &ProxyClient, message: &str) -> Result<String, AppError> {
        let restrictions: Vec<String> = self.onboarding.restrictions().iter().cloned().collect();

        match client
            .chat(message, self.store.list(Category::Fridge), &restrictions)
            .await
        {
            Ok(reply) => {
                self.chat_history.push(ChatEntry {
                    role: ChatRole::User,
                    text: message.trim().to_string(),
                });
                self.chat_history.push(ChatEntry {
                    role: ChatRole::Assistant,
                    text: reply.clone(),
                });
                Ok(reply)
            }
            Err(error) => {
                self.notice(self.error_notice(&error));
                Err(error)
            }
        }
    }

    /// Clear ingredients and everything derived from them in one step
    ///
    /// Dietary selections are kept.
    pub fn reset(&mut self) {
        info!("Resetting application state");
        self.store.reset();
        self.recipe_results.clear();
        self.selected_recipe = None;
        self.image_previews.clear();
        self.chat_history.clear();
        self.notices.clear();
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            fridge: self.store.list(Category::Fridge).to_vec(),
            needed: self.store.list(Category::Needed).to_vec(),
            restrictions: self.onboarding.restrictions().clone(),
            onboarding_phase: self.onboarding.phase(),
            recipes: self.recipe_results.clone(),
            selected_recipe: self.selected_recipe.clone(),
            image_previews: self.image_previews.clone(),
            chat_history: self.chat_history.clone(),
        }
    }

    fn recompute_recipes(&mut self) {
        self.recipe_results = compatibility::filter(
            self.catalog.recipes(),
            &self.store.fridge_names(),
            self.onboarding.restrictions(),
        );
    }

    fn error_notice(&self, error: &AppError) -> String {
        match error {
            AppError::InvalidInput(msg) | AppError::ImageValidation(msg) => {
                t_args_lang(error.notice_key(), &[("msg", msg.as_str())], self.lang())
            }
            _ => t_lang(error.notice_key(), self.lang()),
        }
    }

    fn notice(&mut self, message: String) {
        debug!("Notice: {}", message);
        self.notices.push(message);
    }

    fn lang(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(RecipeCatalog::builtin(), &AppConfig::default())
    }

    #[test]
    fn test_fridge_change_recomputes() {
        let mut app = state();
        assert!(app.recipes().is_empty());

        app.add_manual("chicken breast", "2", Category::Fridge).unwrap();
        app.add_manual("broccoli", "1 head", Category::Fridge).unwrap();
        app.add_manual("eggs", "6", Category::Fridge).unwrap();

        assert_eq!(app.recipes().len(), 1);
        assert_eq!(app.recipes()[0].recipe.title, "Keto Cauliflower Rice Stir-Fry");
    }

    #[test]
    fn test_needed_change_does_not_recompute() {
        let mut app = state();
        app.add_manual("quinoa", "1 cup", Category::Needed).unwrap();
        app.add_manual("olives", "1 jar", Category::Needed).unwrap();
        app.add_manual("lemon", "1", Category::Needed).unwrap();

        assert!(app.recipes().is_empty());
    }

    #[test]
    fn test_blank_manual_entry_rejected() {
        let mut app = state();
        let result = app.add_manual("   ", "1", Category::Fridge);

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(app.store().is_empty());
        assert_eq!(app.take_notices(), vec!["Please enter an ingredient name."]);
    }

    #[test]
    fn test_reset_clears_derived_state() {
        let mut app = state();
        app.add_manual("avocado", "2", Category::Fridge).unwrap();
        app.add_manual("cocoa powder", "1 cup", Category::Fridge).unwrap();
        app.select_recipe("Vegan Chocolate Avocado Mousse");
        app.add_missing_for_selected();

        app.reset();
        let snapshot = app.snapshot();

        assert!(snapshot.fridge.is_empty());
        assert!(snapshot.needed.is_empty());
        assert!(snapshot.recipes.is_empty());
        assert!(snapshot.selected_recipe.is_none());
    }
}
