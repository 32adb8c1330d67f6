//! Profile and access error types.

use chrono::{DateTime, Utc};
use jstudio_models::GenerationMode;
use thiserror::Error;

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors raised by the profile store or the credit gate.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Access expired at {expired_at}")]
    AccessExpired { expired_at: DateTime<Utc> },

    #[error("{mode} generation is not enabled for this account")]
    FeatureDisabled { mode: GenerationMode },

    #[error("No credits remaining")]
    OutOfCredits,

    #[error("Profile store error: {0}")]
    Store(String),
}

impl ProfileError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// True for denials the user can act on (as opposed to store failures).
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::AccessExpired { .. } | Self::FeatureDisabled { .. } | Self::OutOfCredits
        )
    }
}
