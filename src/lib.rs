//! # HealthyBot
//!
//! Kitchen assistant core (fridge inventory, recipe compatibility, shopping
//! list, photo analysis through an AI proxy) and a meeting-point finder that
//! suggests venues halfway between two people.

pub mod app_state;
pub mod compatibility;
pub mod config;
pub mod dietary;
pub mod errors;
pub mod geo;
pub mod image_queue;
pub mod ingredient_model;
pub mod ingredient_store;
pub mod localization;
pub mod proxy_client;
pub mod recipe_catalog;
pub mod recipe_model;
pub mod shopping_list;
pub mod venues;
