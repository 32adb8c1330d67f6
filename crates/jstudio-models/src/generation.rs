//! Photoshoot generation request and per-angle outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aspect::ImageAspectRatio;
use crate::asset::SourceAsset;

/// Maximum characters of model text kept in a failure reason.
pub const TEXT_EXCERPT_CHARS: usize = 50;

// =============================================================================
// Request
// =============================================================================

/// Maximum accepted description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// One user action in photo mode. Read-only during the fan-out.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Product photo.
    pub source: SourceAsset,
    /// Free-text model / styling description.
    pub description: String,
    pub aspect_ratio: ImageAspectRatio,
    /// Optional location photo to composite the model into.
    pub background: Option<SourceAsset>,
}

impl GenerationRequest {
    pub fn new(source: SourceAsset, description: impl Into<String>) -> Self {
        Self {
            source,
            description: description.into(),
            aspect_ratio: ImageAspectRatio::default(),
            background: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: ImageAspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_background(mut self, background: SourceAsset) -> Self {
        self.background = Some(background);
        self
    }

    /// Background asset, only when it carries bytes.
    pub fn usable_background(&self) -> Option<&SourceAsset> {
        self.background.as_ref().filter(|b| !b.is_empty())
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), String> {
        if self.source.is_empty() {
            return Err("Product image is empty".to_string());
        }

        if !self.source.is_image() {
            return Err(format!(
                "Product image has unsupported media type: {}",
                self.source.media_type()
            ));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err("Model description is required".to_string());
        }

        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(format!(
                "Model description exceeds {} characters",
                MAX_DESCRIPTION_CHARS
            ));
        }

        if let Some(background) = self.usable_background() {
            if !background.is_image() {
                return Err(format!(
                    "Background image has unsupported media type: {}",
                    background.media_type()
                ));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// A successfully generated photo for one angle.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub id: Uuid,
    /// Decoded image bytes as returned by the model.
    pub image: Vec<u8>,
    pub mime_type: String,
    /// Angle label this image was generated for.
    pub angle: String,
    /// Angle prompt fragment used.
    pub prompt: String,
    /// PNG with the watermark applied, when the watermark stage ran.
    pub watermarked: Option<Vec<u8>>,
}

impl GeneratedImage {
    pub fn new(
        image: Vec<u8>,
        mime_type: impl Into<String>,
        angle: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            mime_type: mime_type.into(),
            angle: angle.into(),
            prompt: prompt.into(),
            watermarked: None,
        }
    }

    /// Bytes to display or download: watermarked when available.
    pub fn display_bytes(&self) -> &[u8] {
        self.watermarked.as_deref().unwrap_or(&self.image)
    }

    /// Suggested download name, e.g. `jewelry-showcase-Close-up-<id>.png`.
    pub fn download_name(&self) -> String {
        format!("jewelry-showcase-{}-{}.png", self.angle.replace(' ', "_"), self.id)
    }
}

impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("id", &self.id)
            .field("angle", &self.angle)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.image.len())
            .field("watermarked", &self.watermarked.as_ref().map(Vec::len))
            .finish()
    }
}

/// Why a single angle produced no image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The model rejected the request on policy grounds.
    SafetyBlocked,
    /// The response held no inline image; `text` carries any model explanation.
    NoImageReturned { text: Option<String> },
    /// The call exceeded the per-angle deadline.
    Timeout { secs: u64 },
    /// Transport or API error from the backend.
    Backend { message: String },
}

impl FailureReason {
    /// Build a no-image reason, trimming the model's text to an excerpt.
    pub fn no_image(text: Option<&str>) -> Self {
        let text = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| t.chars().take(TEXT_EXCERPT_CHARS).collect());
        FailureReason::NoImageReturned { text }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        FailureReason::Backend {
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::SafetyBlocked => f.write_str("Blocked by safety filters."),
            FailureReason::NoImageReturned { text: Some(text) } => {
                write!(f, "Model returned text instead of image: {}...", text)
            }
            FailureReason::NoImageReturned { text: None } => f.write_str("No image generated."),
            FailureReason::Timeout { secs } => write!(f, "Timed out after {}s", secs),
            FailureReason::Backend { message } => f.write_str(message),
        }
    }
}

/// A failed angle with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleFailure {
    pub angle: String,
    pub reason: FailureReason,
}

/// Result of one angle call. Exactly one exists per submitted angle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(GeneratedImage),
    Failure(AngleFailure),
}

impl GenerationOutcome {
    pub fn failure(angle: impl Into<String>, reason: FailureReason) -> Self {
        GenerationOutcome::Failure(AngleFailure {
            angle: angle.into(),
            reason,
        })
    }

    pub fn angle(&self) -> &str {
        match self {
            GenerationOutcome::Success(image) => &image.angle,
            GenerationOutcome::Failure(failure) => &failure.angle,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }
}

/// Successful subset of a showcase batch plus the failures that were dropped.
#[derive(Debug, Clone, Default)]
pub struct ShowcaseResult {
    /// Successes in angle-catalog order.
    pub images: Vec<GeneratedImage>,
    /// Failed angles, kept so callers can report partial batches.
    pub failures: Vec<AngleFailure>,
}

impl ShowcaseResult {
    /// Number of angles submitted.
    pub fn requested(&self) -> usize {
        self.images.len() + self.failures.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.images.is_empty() && !self.failures.is_empty()
    }

    /// Human summary, e.g. "2 of 3 shots generated".
    pub fn summary(&self) -> String {
        format!("{} of {} shots generated", self.images.len(), self.requested())
    }
}
