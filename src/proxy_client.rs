//! # Proxy Client Module
//!
//! HTTP client for the backend proxy that fronts the AI chat and vision APIs.
//!
//! ## Endpoints
//!
//! - `POST /api/chat` - free-text question with fridge and dietary context
//! - `POST /api/analyze-image` - multipart `image` upload, returns detected ingredients
//! - `GET /api/dashboard` - static demo payload
//!
//! The vision model answers in free text that is supposed to be a JSON array,
//! sometimes wrapped in a markdown code fence. When the proxy could not decode
//! it, the client retries on `rawResponse`; an undecodable answer means zero
//! ingredients detected.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::image_queue::UploadedImage;
use crate::ingredient_model::Ingredient;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$")
        .expect("Code fence pattern should be valid");
}

/// One ingredient recognized in a fridge photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    /// 0.0 to 1.0; missing confidence counts as 0
    #[serde(default)]
    pub confidence: f64,
}

/// Result of analyzing one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub ingredients: Vec<DetectedIngredient>,
    pub raw_response: Option<String>,
}

impl ImageAnalysis {
    /// Detections at or above `min_confidence`, in response order
    pub fn confident(&self, min_confidence: f64) -> Vec<&DetectedIngredient> {
        self.ingredients
            .iter()
            .filter(|ingredient| ingredient.confidence >= min_confidence)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub users: u64,
    pub sales: u64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub message: String,
    pub stats: DashboardStats,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    message: &'a str,
    fridge_ingredients: Vec<ChatIngredient<'a>>,
    dietary_restrictions: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct ChatIngredient<'a> {
    name: &'a str,
    quantity: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    reply: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    success: bool,
    #[serde(default)]
    ingredients: Value,
    raw_response: Option<String>,
    message: Option<String>,
}

/// Failure bodies: `{success: false, message, openaiError?}` or `{error}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyFailure {
    message: Option<String>,
    error: Option<String>,
    openai_error: Option<Value>,
}

/// Parse a vision model answer into detections, stripping a code fence if present
pub fn parse_detected_ingredients(raw: &str) -> Result<Vec<DetectedIngredient>, AppError> {
    let trimmed = raw.trim();
    let body = match CODE_FENCE.captures(trimmed) {
        Some(captures) => captures.get(1).map_or("", |m| m.as_str()),
        None => trimmed,
    };

    let ingredients: Vec<DetectedIngredient> = serde_json::from_str(body)?;
    Ok(ingredients)
}

pub struct ProxyClient {
    http_client: Client,
    base_url: String,
}

impl ProxyClient {
    /// Create a client for the proxy at `base_url` (including the `/api` prefix)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent("HealthyBot/0.1")
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            &config.proxy_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Ask the assistant a question in the context of the fridge and diet
    pub async fn chat(
        &self,
        message: &str,
        fridge: &[Ingredient],
        restrictions: &[String],
    ) -> Result<String, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::InvalidInput("chat message is empty".to_string()));
        }

        let request = ChatRequest {
            message: message.trim(),
            fridge_ingredients: fridge
                .iter()
                .map(|item| ChatIngredient {
                    name: &item.name,
                    quantity: &item.quantity,
                })
                .collect(),
            dietary_restrictions: restrictions.iter().map(String::as_str).collect(),
        };

        debug!(
            "Sending chat message with {} fridge item(s), {} restriction(s)",
            request.fridge_ingredients.len(),
            request.dietary_restrictions.len()
        );

        let response = self
            .http_client
            .post(format!("{}/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let reply: ChatReply = response.json().await?;
        info!("Chat reply received ({} chars)", reply.reply.len());
        Ok(reply.reply)
    }

    /// Send one image to the vision endpoint
    pub async fn analyze_image(&self, image: &UploadedImage) -> Result<ImageAnalysis, AppError> {
        info!("Analyzing {} ({} bytes)", image.file_name, image.bytes.len());

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type)?;
        let form = Form::new().part("image", part);

        let response = self
            .http_client
            .post(format!("{}/analyze-image", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: AnalyzeResponse = response.json().await?;
        if !body.success {
            return Err(AppError::Api {
                status: 200,
                message: body.message.unwrap_or_else(|| "analysis failed".to_string()),
            });
        }

        let ingredients = decode_detections(body.ingredients, body.raw_response.as_deref());
        info!("{} detected {} ingredient(s)", image.file_name, ingredients.len());

        Ok(ImageAnalysis {
            ingredients,
            raw_response: body.raw_response,
        })
    }

    /// Fetch the demo dashboard payload
    pub async fn dashboard(&self) -> Result<DashboardPayload, AppError> {
        let response = self
            .http_client
            .get(format!("{}/dashboard", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response.json().await?)
    }
}

/// Decode the proxy's `ingredients` array, falling back to the raw model answer
fn decode_detections(ingredients: Value, raw_response: Option<&str>) -> Vec<DetectedIngredient> {
    if let Ok(parsed) = serde_json::from_value::<Vec<DetectedIngredient>>(ingredients) {
        if !parsed.is_empty() || raw_response.is_none() {
            return parsed;
        }
    }

    match raw_response.map(parse_detected_ingredients) {
        Some(Ok(parsed)) => parsed,
        Some(Err(e)) => {
            warn!("Could not parse vision response, treating as no ingredients: {}", e);
            Vec::new()
        }
        None => {
            warn!("Vision response carried no decodable ingredients");
            Vec::new()
        }
    }
}

async fn api_error(response: Response) -> AppError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ProxyFailure>(&body) {
        Ok(failure) => {
            if let Some(detail) = &failure.openai_error {
                warn!("Upstream AI error: {}", detail);
            }
            failure.message.or(failure.error).unwrap_or(body)
        }
        Err(_) => body,
    };

    warn!("Proxy returned HTTP {}: {}", status, message);
    AppError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json_array() {
        let parsed =
            parse_detected_ingredients(r#"[{"name": "milk", "quantity": "1 gallon", "confidence": 0.88}]"#)
                .unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "milk");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n[{\"name\": \"tomatoes\", \"quantity\": \"4 medium\", \"confidence\": 0.95}]\n```";
        let parsed = parse_detected_ingredients(raw).unwrap();
        assert_eq!(parsed[0].quantity, "4 medium");

        let bare_fence = "```\n[]\n```";
        assert!(parse_detected_ingredients(bare_fence).unwrap().is_empty());
    }

    #[test]
    fn test_parse_prose_is_error() {
        let result = parse_detected_ingredients("I see some milk and eggs.");
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_decode_falls_back_to_raw_response() {
        let raw = "```json\n[{\"name\": \"eggs\", \"quantity\": \"6\", \"confidence\": 0.9}]\n```";
        let decoded = decode_detections(Value::Null, Some(raw));
        assert_eq!(decoded.len(), 1);

        assert!(decode_detections(Value::Null, Some("no idea")).is_empty());
    }

    #[test]
    fn test_confident_filters_below_threshold() {
        let analysis = ImageAnalysis {
            ingredients: vec![
                DetectedIngredient { name: "milk".into(), quantity: "1".into(), confidence: 0.88 },
                DetectedIngredient { name: "jam".into(), quantity: "1".into(), confidence: 0.5 },
                DetectedIngredient { name: "eggs".into(), quantity: "6".into(), confidence: 0.7 },
            ],
            raw_response: None,
        };

        let names: Vec<&str> = analysis.confident(0.7).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["milk", "eggs"]);
    }
}
