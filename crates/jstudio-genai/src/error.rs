//! Generative backend error types.

use thiserror::Error;

/// Result type for backend operations.
pub type GenAiResult<T> = Result<T, GenAiError>;

/// Errors that can occur while talking to the generative backend.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by backend")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl GenAiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map a non-success HTTP status and body into an error.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            429 => Self::RateLimited {
                retry_after_ms: None,
            },
            _ => Self::Api {
                status,
                message: extract_error_message(&body.into()),
            },
        }
    }

    /// HTTP status associated with the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => !e.is_builder(),
            Self::RateLimited { .. } | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Pull `error.message` out of a Google-style error body, else return the body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_google_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let err = GenAiError::from_http_status(400, body);
        assert_eq!(err.to_string(), "Backend returned HTTP 400: API key not valid.");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_plain_body_kept() {
        let err = GenAiError::from_http_status(503, " overloaded ");
        assert!(matches!(&err, GenAiError::Api { status: 503, message } if message == "overloaded"));
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), Some(503));
    }

    #[test]
    fn test_rate_limited() {
        let err = GenAiError::from_http_status(429, "slow down");
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), Some(429));
        assert_eq!(err.retry_after_ms(), None);
    }

    #[test]
    fn test_config_not_retryable() {
        assert!(!GenAiError::config("missing key").is_retryable());
    }
}
