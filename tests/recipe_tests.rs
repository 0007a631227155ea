//! # Recipe Tests
//!
//! End-to-end checks of compatibility scoring, dietary filtering and
//! shopping-list reconciliation against the ingredient store.

use std::collections::BTreeSet;

use healthybot::compatibility::{filter, filter_by_diet, score};
use healthybot::ingredient_model::{Category, Ingredient, Source};
use healthybot::ingredient_store::IngredientStore;
use healthybot::recipe_catalog::RecipeCatalog;
use healthybot::recipe_model::{Difficulty, RankedRecipe, Recipe, RecipeBadge, RecipeSource};
use healthybot::shopping_list::{append_missing, missing_for};

fn make_recipe(title: &str, ingredients: &[&str], tags: &[&str]) -> Recipe {
    Recipe {
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: vec!["Cook".to_string()],
        prep_time: "10 minutes".to_string(),
        cook_time: "10 minutes".to_string(),
        servings: 2,
        difficulty: Difficulty::Easy,
        cuisine: "Test".to_string(),
        dietary_tags: tags.iter().map(|s| s.to_string()).collect(),
        source: RecipeSource::Catalog,
    }
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn restrictions(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_stir_fry_example_end_to_end() {
    let recipe = make_recipe(
        "Stir-Fry",
        &["chicken breast", "broccoli", "carrots", "soy sauce", "ginger", "garlic"],
        &["gluten-free"],
    );
    let mut store = IngredientStore::new();
    store.add(Ingredient::new("chicken breast", "2", Category::Fridge, Source::Manual));
    store.add(Ingredient::new("broccoli", "1 head", Category::Fridge, Source::Manual));
    let fridge = store.fridge_names();

    let percentage = score(&recipe, &fridge);
    assert!((percentage - 33.333).abs() < 0.01, "got {percentage}");

    let ranked = filter(std::slice::from_ref(&recipe), &fridge, &BTreeSet::new());
    assert_eq!(ranked.len(), 1);

    assert_eq!(
        missing_for(&recipe, &fridge),
        vec!["carrots", "soy sauce", "ginger", "garlic"]
    );
}

#[test]
fn test_score_threshold_is_strict() {
    // 3 of 10 is exactly 30%, which is not enough
    let recipe = make_recipe(
        "Ten Things",
        &["a1", "a2", "a3", "b1", "b2", "b3", "b4", "b5", "b6", "b7"],
        &[],
    );
    let fridge = names(&["a1", "a2", "a3"]);

    assert_eq!(score(&recipe, &fridge), 30.0);
    assert!(filter(&[recipe], &fridge, &BTreeSet::new()).is_empty());
}

#[test]
fn test_vegan_restriction_excludes_non_vegan_regardless_of_score() {
    let catalog = RecipeCatalog::builtin();
    let quinoa = catalog.find("Mediterranean Quinoa Bowl").unwrap();
    let fridge = quinoa.ingredients.clone();

    let unrestricted = filter(catalog.recipes(), &fridge, &BTreeSet::new());
    assert_eq!(unrestricted[0].recipe.title, "Mediterranean Quinoa Bowl");
    assert_eq!(unrestricted[0].compatibility_score, 100.0);

    let vegan = filter(catalog.recipes(), &fridge, &restrictions(&["vegan"]));
    assert!(vegan
        .iter()
        .all(|ranked| ranked.recipe.dietary_tags.contains("vegan")));
    assert!(vegan.iter().all(|ranked| ranked.recipe.title != "Mediterranean Quinoa Bowl"));
}

#[test]
fn test_restrictions_must_all_be_satisfied() {
    let catalog = RecipeCatalog::builtin();
    let matching = filter_by_diet(catalog.recipes(), &restrictions(&["vegan", "gluten-free"]));
    let titles: Vec<&str> = matching.iter().map(|r| r.title.as_str()).collect();

    assert_eq!(titles, vec!["Vegan Buddha Bowl", "Vegan Chocolate Avocado Mousse"]);
    assert_eq!(filter_by_diet(catalog.recipes(), &BTreeSet::new()).len(), 6);
}

#[test]
fn test_ranking_descending_and_stable_on_ties() {
    let recipes = vec![
        make_recipe("First Half", &["rice", "beans"], &[]),
        make_recipe("Full", &["rice"], &[]),
        make_recipe("Second Half", &["rice", "corn"], &[]),
    ];
    let ranked = filter(&recipes, &names(&["Rice"]), &BTreeSet::new());
    let titles: Vec<&str> = ranked.iter().map(|r| r.recipe.title.as_str()).collect();

    assert_eq!(titles, vec!["Full", "First Half", "Second Half"]);
}

#[test]
fn test_append_missing_is_idempotent() {
    let catalog = RecipeCatalog::builtin();
    let recipe = catalog.find("Low-Carb Zucchini Lasagna").unwrap();
    let mut store = IngredientStore::new();
    store.add(Ingredient::new("zucchini", "3", Category::Fridge, Source::Manual));
    store.add(Ingredient::new("basil", "1 bunch", Category::Fridge, Source::Manual));

    let first = append_missing(&mut store, recipe);
    let second = append_missing(&mut store, recipe);

    assert_eq!(first, 5);
    assert_eq!(second, 0);
    assert_eq!(store.list(Category::Needed).len(), 5);
}

#[test]
fn test_append_missing_across_recipes_shares_entries() {
    let catalog = RecipeCatalog::builtin();
    let mut store = IngredientStore::new();

    append_missing(&mut store, catalog.find("Mediterranean Quinoa Bowl").unwrap());
    let added = append_missing(&mut store, catalog.find("Dairy-Free Pasta Primavera").unwrap());

    // "cherry tomatoes" and "olive oil" are already on the list
    assert_eq!(added, 5);
    let needed: Vec<String> = store
        .list(Category::Needed)
        .iter()
        .map(|i| i.normalized_name())
        .collect();
    assert_eq!(needed.iter().filter(|n| *n == "olive oil").count(), 1);
}

#[test]
fn test_duplicate_tomato_not_added() {
    let mut store = IngredientStore::new();
    assert!(store.add(Ingredient::new("tomato", "2", Category::Fridge, Source::Manual)));
    assert!(!store.add(Ingredient::new("Tomato", "5", Category::Fridge, Source::Image)));

    assert_eq!(store.list(Category::Fridge).len(), 1);
    assert_eq!(store.list(Category::Fridge)[0].quantity, "2");
}

#[test]
fn test_badges_follow_recipe_source() {
    let catalog_recipe = RankedRecipe {
        recipe: make_recipe("Catalog", &["rice"], &["vegan"]),
        compatibility_score: 66.6,
    };
    assert_eq!(catalog_recipe.badge(), RecipeBadge::Compatibility(67));

    let mut generated = make_recipe("Photo Salad", &["lettuce"], &["gluten-free", "vegan"]);
    generated.source = RecipeSource::ImageGenerated;
    let generated = RankedRecipe {
        recipe: generated,
        compatibility_score: 100.0,
    };
    assert_eq!(
        generated.badge(),
        RecipeBadge::DietaryTags(vec!["gluten free".to_string(), "vegan".to_string()])
    );
}
