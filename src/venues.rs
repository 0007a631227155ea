//! # Venue Ranking Module
//!
//! Finds places to meet around the midpoint of two participants.
//!
//! Venues come from a places HTTP API when one is configured. Any failure of
//! that API (missing key, transport error, non-success status, undecodable
//! body) degrades to a fixed list of four mock venues around the center, so a
//! meeting plan is always produced.
//!
//! "Ranking" annotates each venue with its distance to both participants; the
//! source order is kept.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::geo::{distance, format_location, midpoint, Location};

/// Offsets (degrees) and descriptions of the fallback venues
const MOCK_VENUES: &[(&str, f64, f64, Option<f32>, &str)] = &[
    ("Midpoint Café", 0.001, 0.001, Some(4.5), "cafe"),
    ("Halfway Bistro", -0.001, 0.0015, Some(4.2), "restaurant"),
    ("Meeting Point Park", 0.0015, -0.001, None, "park"),
    ("Crossroads Coffee", -0.002, -0.0005, Some(4.0), "cafe"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub rating: Option<f32>,
    pub categories: Vec<String>,
    pub address: String,
    pub location: Location,
}

/// A venue with its distance to each participant, in kilometers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedVenue {
    pub venue: Venue,
    pub distance_to_user_a_km: f64,
    pub distance_to_user_b_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPlan {
    pub center: Location,
    pub venues: Vec<RankedVenue>,
    /// `true` when the places API was unavailable and mock venues were used
    pub used_fallback: bool,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    rating: Option<f32>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    vicinity: String,
    geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

/// Read-only client for the nearby-search and reverse-geocoding APIs
pub struct PlacesClient {
    http_client: Client,
    places_base_url: String,
    geocode_base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(
        api_key: &str,
        places_base_url: &str,
        geocode_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent("HealthyBot/0.1")
            .build()?;

        Ok(Self {
            http_client,
            places_base_url: places_base_url.trim_end_matches('/').to_string(),
            geocode_base_url: geocode_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build a client when a places API key is configured
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, AppError> {
        match &config.places_api_key {
            Some(key) => Self::new(
                key,
                &config.places_base_url,
                &config.geocode_base_url,
                Duration::from_secs(config.request_timeout_secs),
            )
            .map(Some),
            None => {
                info!("No places API key configured, venue lookup will use mock venues");
                Ok(None)
            }
        }
    }

    /// Venues within `radius_m` meters of `center`, in API order
    pub async fn nearby(&self, center: &Location, radius_m: u32) -> Result<Vec<Venue>, AppError> {
        debug!("Nearby search at {} within {}m", center, radius_m);

        let response = self
            .http_client
            .get(format!("{}/nearbysearch/json", self.places_base_url))
            .query(&[
                ("location", center.to_string()),
                ("radius", radius_m.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: http_status.as_u16(),
                message: body,
            });
        }

        let places: PlacesResponse = response.json().await?;
        if places.status != "OK" {
            return Err(AppError::Api {
                status: http_status.as_u16(),
                message: match places.error_message {
                    Some(detail) => format!("{}: {}", places.status, detail),
                    None => places.status,
                },
            });
        }

        let venues: Vec<Venue> = places
            .results
            .into_iter()
            .map(|place| Venue {
                id: place.place_id,
                name: place.name,
                rating: place.rating,
                categories: place.types,
                address: place.vicinity,
                location: place.geometry.location,
            })
            .collect();

        info!("Places API returned {} venues", venues.len());
        Ok(venues)
    }

    /// Street address for a location
    pub async fn reverse_geocode(&self, location: &Location) -> Result<String, AppError> {
        let response = self
            .http_client
            .get(format!("{}/json", self.geocode_base_url))
            .query(&[("latlng", location.to_string()), ("key", self.api_key.clone())])
            .send()
            .await?
            .error_for_status()?;

        let geocode: GeocodeResponse = response.json().await?;
        if geocode.status != "OK" {
            return Err(AppError::Api {
                status: 200,
                message: geocode.status,
            });
        }

        geocode
            .results
            .into_iter()
            .next()
            .map(|result| result.formatted_address)
            .ok_or_else(|| AppError::Parse("geocoding returned no results".to_string()))
    }
}

/// Deterministic venues placed within 0.002° of `center`
pub fn mock_venues(center: &Location) -> Vec<Venue> {
    MOCK_VENUES
        .iter()
        .enumerate()
        .map(|(i, (name, d_lat, d_lng, rating, category))| Venue {
            id: format!("mock-{}", i + 1),
            name: name.to_string(),
            rating: *rating,
            categories: vec![category.to_string()],
            address: format!("Near {}", format_location(center)),
            location: center.offset(*d_lat, *d_lng),
        })
        .collect()
}

/// Annotate venues with participant distances, keeping at most `max_venues`
pub fn rank_venues(
    venues: Vec<Venue>,
    user_a: &Location,
    user_b: &Location,
    max_venues: usize,
) -> Vec<RankedVenue> {
    venues
        .into_iter()
        .take(max_venues)
        .map(|venue| RankedVenue {
            distance_to_user_a_km: distance(user_a, &venue.location),
            distance_to_user_b_km: distance(user_b, &venue.location),
            venue,
        })
        .collect()
}

/// Venues around the midpoint of two participants
pub async fn find_meeting_venues(
    places: Option<&PlacesClient>,
    user_a: &Location,
    user_b: &Location,
    radius_m: u32,
    max_venues: usize,
) -> MeetingPlan {
    let center = midpoint(user_a, user_b);

    let (venues, used_fallback) = match places {
        Some(client) => match client.nearby(&center, radius_m).await {
            Ok(venues) => (venues, false),
            Err(e) => {
                warn!("Venue lookup failed, using mock venues: {}", e);
                (mock_venues(&center), true)
            }
        },
        None => (mock_venues(&center), true),
    };

    MeetingPlan {
        center,
        venues: rank_venues(venues, user_a, user_b, max_venues),
        used_fallback,
    }
}

/// Address for a location, or its coordinates when lookup is unavailable
pub async fn describe_location(places: Option<&PlacesClient>, location: &Location) -> String {
    if let Some(client) = places {
        match client.reverse_geocode(location).await {
            Ok(address) => return address,
            Err(e) => warn!("Reverse geocoding failed for {}: {}", location, e),
        }
    }
    format_location(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_venues_near_center() {
        let center = Location::new(40.0, -74.0).unwrap();
        let venues = mock_venues(&center);

        assert_eq!(venues.len(), 4);
        for venue in &venues {
            assert!((venue.location.lat - center.lat).abs() <= 0.002 + 1e-9);
            assert!((venue.location.lng - center.lng).abs() <= 0.002 + 1e-9);
        }
    }

    #[test]
    fn test_rank_venues_caps_and_keeps_order() {
        let a = Location::new(40.0, -74.0).unwrap();
        let b = Location::new(40.01, -74.01).unwrap();
        let center = midpoint(&a, &b);
        let venues: Vec<Venue> = (0..12)
            .map(|i| Venue {
                id: format!("v{i}"),
                name: format!("Venue {i}"),
                rating: None,
                categories: vec![],
                address: String::new(),
                location: center.offset(0.0001 * i as f64, 0.0),
            })
            .collect();

        let ranked = rank_venues(venues, &a, &b, 8);

        assert_eq!(ranked.len(), 8);
        assert_eq!(ranked[0].venue.id, "v0");
        assert_eq!(ranked[7].venue.id, "v7");
        assert!(ranked[0].distance_to_user_a_km > 0.0);
    }

    #[tokio::test]
    async fn test_no_client_uses_fallback() {
        let a = Location::new(40.0, -74.0).unwrap();
        let plan = find_meeting_venues(None, &a, &a, 1500, 8).await;

        assert!(plan.used_fallback);
        assert_eq!(plan.center, a);
        assert_eq!(plan.venues.len(), 4);
    }
}
