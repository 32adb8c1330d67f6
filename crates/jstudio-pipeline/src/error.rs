//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Every angle of a showcase failed. Reasons are distinct, in first-seen order.
    #[error("Generation failed: {}", .reasons.join(", "))]
    GenerationFailed { reasons: Vec<String> },

    #[error("Video submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Video polling failed after {attempts} consecutive attempts: {message}")]
    PollFailed { attempts: u32, message: String },

    #[error("Video generation failed to return a download link (operation {operation})")]
    MissingAsset {
        operation: String,
        backend_error: Option<String>,
    },

    #[error("Example photos are disabled for this studio")]
    ExamplesHidden,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Media error: {0}")]
    Media(#[from] jstudio_media::MediaError),

    #[error("Backend error: {0}")]
    GenAi(#[from] jstudio_genai::GenAiError),

    #[error("Access error: {0}")]
    Profile(#[from] jstudio_profile::ProfileError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn submission_failed(msg: impl Into<String>) -> Self {
        Self::SubmissionFailed(msg.into())
    }

    /// Failures that cannot succeed on a retry of the same input.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidRequest(_)
            | Self::SubmissionFailed(_)
            | Self::MissingAsset { .. }
            | Self::ExamplesHidden
            | Self::Profile(_) => true,
            Self::Media(e) => e.is_fatal(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failed_message() {
        let err = PipelineError::GenerationFailed {
            reasons: vec![
                "Blocked by safety filters.".to_string(),
                "No image generated.".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Generation failed: Blocked by safety filters., No image generated."
        );
    }

    #[test]
    fn test_fatality() {
        assert!(PipelineError::submission_failed("rejected").is_fatal());
        assert!(!PipelineError::Cancelled.is_fatal());
        assert!(!PipelineError::PollFailed {
            attempts: 3,
            message: "down".into()
        }
        .is_fatal());
    }
}
