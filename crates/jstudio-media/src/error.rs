//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while preparing or compositing images.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Fetch failed for {url}: {message}")]
    Fetch {
        url: String,
        message: String,
        status: Option<u16>,
    },

    #[error("Render context unavailable: {0}")]
    RenderContextUnavailable(String),

    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Create a fetch failure error.
    pub fn fetch_failed(url: impl Into<String>, message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
            status,
        }
    }

    pub fn render_context(message: impl Into<String>) -> Self {
        Self::RenderContextUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Environment-level failures that no retry or input change will fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MediaError::RenderContextUnavailable(_) | MediaError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let err = MediaError::fetch_failed("https://x/a.jpg", "HTTP 404 Not Found", Some(404));
        assert_eq!(err.to_string(), "Fetch failed for https://x/a.jpg: HTTP 404 Not Found");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_render_context_is_fatal() {
        assert!(MediaError::render_context("no canvas").is_fatal());
        assert!(!MediaError::encoding("empty").is_fatal());
    }
}
