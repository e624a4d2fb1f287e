//! Error types for the appraisal client
//!
//! This module provides error handling using thiserror for structured error
//! definitions and anyhow for error propagation at the binary edge.
//!
//! Backend failures are classified the way the pages need them:
//! transport failures, authorization failures (which drive the token refresh
//! flow), validation failures whose message is shown verbatim, and not-found.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Main error type for appraisal client operations
#[derive(Error, Debug)]
pub enum AppraiseError {
    /// Network or transport failure (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend rejected the request payload (4xx with a message body)
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// Requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend failed (5xx or unexpected status)
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Criterion name outside the fixed competency list
    #[error("Unknown criterion: {0}")]
    UnknownCriterion(String),

    /// Rating outside the 1-5 scale
    #[error("Invalid rating {0}: expected a value between 1 and 5")]
    InvalidRating(u8),

    /// The authenticated reviewer has no review on this appraisal
    #[error("No review by reviewer {reviewer} on appraisal {appraisal}")]
    ReviewNotFound { appraisal: i64, reviewer: i64 },

    /// Operation requires a logged-in session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Operation not allowed in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Signature rendering failed
    #[error("Signature error: {0}")]
    Signature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for appraisal client operations
pub type Result<T> = std::result::Result<T, AppraiseError>;

/// Convert anyhow::Error to AppraiseError
impl From<anyhow::Error> for AppraiseError {
    fn from(err: anyhow::Error) -> Self {
        AppraiseError::Other(err.to_string())
    }
}

impl AppraiseError {
    /// Classify a non-success response by status and body
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => AppraiseError::Unauthorized(message),
            StatusCode::NOT_FOUND => AppraiseError::NotFound(message),
            s if s.is_client_error() => AppraiseError::Validation {
                status: s.as_u16(),
                message,
            },
            s => AppraiseError::Server {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Whether this is an authorization failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppraiseError::Unauthorized(_))
    }

    /// Whether this is a not-found failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppraiseError::NotFound(_))
    }

    /// Text to show the user: backend validation messages verbatim, otherwise
    /// the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppraiseError::Validation { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pull a human-readable message out of a backend error body.
///
/// Accepts `{"message": ..}`, `{"error": ..}`, `{"detail": ..}`, field error
/// maps such as `{"cycle": ["This field is required."]}`, or plain text.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => return Some(trimmed.to_string()),
    };

    match value {
        Value::Object(map) => {
            for key in ["message", "error", "detail"] {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }

            let fields: Vec<String> = map
                .iter()
                .filter_map(|(field, errors)| {
                    let text = flatten_errors(errors);
                    (!text.is_empty()).then(|| format!("{}: {}", field, text))
                })
                .collect();

            (!fields.is_empty()).then(|| fields.join("; "))
        }
        Value::Array(_) => {
            let text = flatten_errors(&value);
            (!text.is_empty()).then_some(text)
        }
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn flatten_errors(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(flatten_errors)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppraiseError::UnknownCriterion("Punctuality".to_string());
        assert_eq!(err.to_string(), "Unknown criterion: Punctuality");
    }

    #[test]
    fn test_message_key_is_verbatim() {
        let err = AppraiseError::from_response_body(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Appraisee must be a project member"}"#,
        );
        assert!(matches!(err, AppraiseError::Validation { status: 400, .. }));
        assert_eq!(
            err.user_message("Failed to create appraisal"),
            "Appraisee must be a project member"
        );
    }

    #[test]
    fn test_error_and_detail_keys() {
        let err = AppraiseError::from_response_body(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid credentials"}"#,
        );
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");

        let err =
            AppraiseError::from_response_body(StatusCode::NOT_FOUND, r#"{"detail": "Not found."}"#);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_field_errors_are_joined() {
        let err = AppraiseError::from_response_body(
            StatusCode::BAD_REQUEST,
            r#"{"cycle": ["This field is required."]}"#,
        );
        assert_eq!(err.to_string(), "cycle: This field is required.");
    }

    #[test]
    fn test_empty_body_falls_back_to_reason() {
        let err = AppraiseError::from_response_body(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "Server error 500: Internal Server Error");
        assert_eq!(err.user_message("Failed to load"), "Failed to load");
    }

    #[test]
    fn test_plain_text_body() {
        let err = AppraiseError::from_response_body(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, AppraiseError::Server { status: 502, .. }));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: AppraiseError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppraiseError::Other(ref s) if s == "boom"));
    }
}
