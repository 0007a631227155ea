//! # Configuration Module
//!
//! Defaults for the proxy, places and upload settings, with environment overrides.

use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};

// Constants for application configuration
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 1500;
pub const MAX_VENUES: usize = 8;
pub const MIN_DETECTION_CONFIDENCE: f64 = 0.7;
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024; // 10MB, same limit as the proxy
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LANGUAGE: &str = "en";

/// Runtime configuration for the assistant and the meeting-point finder
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the backend proxy, including the `/api` prefix
    pub proxy_base_url: String,
    /// Places API key; without one the venue lookup always uses mock venues
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub geocode_base_url: String,
    /// Venue search radius in meters
    pub search_radius_m: u32,
    /// Maximum number of venues returned for a meeting point
    pub max_venues: usize,
    /// Image detections below this confidence are discarded
    pub min_confidence: f64,
    /// Maximum upload size in bytes
    pub max_upload_bytes: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Language code for user-visible notices
    pub language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: DEFAULT_PROXY_URL.to_string(),
            places_api_key: None,
            places_base_url: DEFAULT_PLACES_BASE_URL.to_string(),
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            max_venues: MAX_VENUES,
            min_confidence: MIN_DETECTION_CONFIDENCE,
            max_upload_bytes: MAX_UPLOAD_SIZE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            proxy_base_url: env::var("HEALTHYBOT_PROXY_URL").unwrap_or(defaults.proxy_base_url),
            places_api_key: env::var("PLACES_API_KEY").ok().filter(|key| !key.trim().is_empty()),
            places_base_url: env::var("PLACES_BASE_URL").unwrap_or(defaults.places_base_url),
            geocode_base_url: env::var("GEOCODE_BASE_URL").unwrap_or(defaults.geocode_base_url),
            search_radius_m: parse_var("VENUE_SEARCH_RADIUS_M", defaults.search_radius_m)?,
            max_venues: parse_var("MAX_VENUES", defaults.max_venues)?,
            min_confidence: parse_var("MIN_DETECTION_CONFIDENCE", defaults.min_confidence)?,
            max_upload_bytes: defaults.max_upload_bytes,
            request_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            language: env::var("HEALTHYBOT_LANG").unwrap_or(defaults.language),
        };

        config.validate()?;
        info!(
            "Configuration loaded: proxy={}, places_key_set={}, radius={}m",
            config.proxy_base_url,
            config.places_api_key.is_some(),
            config.search_radius_m
        );
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.proxy_base_url.trim().is_empty() {
            anyhow::bail!("Proxy URL cannot be empty");
        }
        if self.search_radius_m == 0 {
            anyhow::bail!("Venue search radius must be greater than 0");
        }
        if self.max_venues == 0 {
            anyhow::bail!("MAX_VENUES must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            anyhow::bail!("MIN_DETECTION_CONFIDENCE must be between 0.0 and 1.0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than 0");
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => {
            debug!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
