//! # Geo Math Module
//!
//! Distance, midpoint and coordinate helpers for the meeting-point finder.
//!
//! ## Features
//!
//! - Haversine distance on a spherical Earth (radius 6371 km)
//! - Arithmetic midpoint of two participants (accurate enough at city scale)
//! - Human-readable distances ("350 m", "2.5 km")
//! - `lat,lng` parsing for manual entry and shareable links

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Query parameter carrying the friend's location in a shareable link
pub const FRIEND_QUERY_PARAM: &str = "friend";

lazy_static! {
    static ref COORDINATE_PAIR: Regex =
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$")
            .expect("Coordinate pair pattern should be valid");
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Create a location, rejecting non-finite or out-of-range coordinates
    pub fn new(lat: f64, lng: f64) -> Result<Self, AppError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(AppError::InvalidInput("coordinates must be numbers".to_string()));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidInput(format!("latitude {lat} is out of range")));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::InvalidInput(format!("longitude {lng} is out of range")));
        }
        Ok(Self { lat, lng })
    }

    /// Offset this location by a number of degrees, without validation
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Location {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = COORDINATE_PAIR
            .captures(s)
            .ok_or_else(|| AppError::InvalidInput(format!("'{s}' is not a lat,lng pair")))?;

        let lat: f64 = captures[1]
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("invalid latitude in '{s}'")))?;
        let lng: f64 = captures[2]
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("invalid longitude in '{s}'")))?;

        Location::new(lat, lng)
    }
}

/// Great-circle distance between two points in kilometers (haversine)
pub fn distance(a: &Location, b: &Location) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Arithmetic mean of latitudes and longitudes
pub fn midpoint(a: &Location, b: &Location) -> Location {
    Location {
        lat: (a.lat + b.lat) / 2.0,
        lng: (a.lng + b.lng) / 2.0,
    }
}

/// Render a distance: meters below 1 km, otherwise kilometers with one decimal
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{km:.1} km")
    }
}

/// Label used when no address is available for a location
pub fn format_location(location: &Location) -> String {
    format!("{:.4}, {:.4}", location.lat, location.lng)
}

/// Validate manually typed coordinates (used when geolocation is unavailable)
pub fn parse_manual_coordinates(lat_text: &str, lng_text: &str) -> Result<Location, AppError> {
    let lat: f64 = lat_text.trim().parse().map_err(|_| {
        debug!("Rejected manual latitude '{}'", lat_text);
        AppError::InvalidInput(format!("latitude '{}' is not a number", lat_text.trim()))
    })?;
    let lng: f64 = lng_text.trim().parse().map_err(|_| {
        debug!("Rejected manual longitude '{}'", lng_text);
        AppError::InvalidInput(format!("longitude '{}' is not a number", lng_text.trim()))
    })?;

    Location::new(lat, lng)
}

/// Build a link that carries `location` as the friend's position
pub fn share_link(base_url: &str, location: &Location) -> Result<String, AppError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AppError::InvalidInput(format!("invalid base URL '{base_url}': {e}")))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != FRIEND_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(FRIEND_QUERY_PARAM, &location.to_string());

    Ok(url.to_string())
}

/// Read the friend's location from a shareable link, if present and valid
pub fn friend_from_link(link: &str) -> Option<Location> {
    let url = Url::parse(link).ok()?;
    let raw = url
        .query_pairs()
        .find(|(key, _)| key == FRIEND_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())?;

    match raw.parse() {
        Ok(location) => Some(location),
        Err(e) => {
            warn!("Ignoring malformed friend location '{}': {}", raw, e);
            None
        }
    }
}
