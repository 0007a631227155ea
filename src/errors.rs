//! # Error Types Module
//!
//! This module defines the error type shared by the kitchen assistant and the
//! meeting-point finder. Every variant is recoverable: callers either substitute
//! a fallback value or surface a short localized notice.

/// Errors raised by network collaborators and input validation
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Transport failures (connection refused, timeout, DNS)
    Network(String),
    /// The remote service answered with a non-success status
    Api { status: u16, message: String },
    /// Rejected user input (non-numeric coordinates, empty chat message)
    InvalidInput(String),
    /// A response body could not be decoded
    Parse(String),
    /// Upload rejected before it was sent (size, format, unreadable file)
    ImageValidation(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {msg}"),
            AppError::Api { status, message } => write!(f, "API error ({status}): {message}"),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            AppError::Parse(msg) => write!(f, "Parse error: {msg}"),
            AppError::ImageValidation(msg) => write!(f, "Image validation error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return AppError::Parse(err.to_string());
        }
        match err.status() {
            Some(status) => AppError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => AppError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl AppError {
    /// Localization key for the notice shown to the user
    pub fn notice_key(&self) -> &'static str {
        match self {
            AppError::Network(_) => "error-network",
            AppError::Api { .. } => "error-api",
            AppError::InvalidInput(_) => "error-invalid-input",
            AppError::Parse(_) => "error-no-ingredients",
            AppError::ImageValidation(_) => "error-image-validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status() {
        let err = AppError::Api {
            status: 500,
            message: "upstream failed".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): upstream failed");
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: AppError = serde_json::from_str::<Vec<u8>>("not json").unwrap_err().into();
        assert!(matches!(err, AppError::Parse(_)));
        assert_eq!(err.notice_key(), "error-no-ingredients");
    }
}
