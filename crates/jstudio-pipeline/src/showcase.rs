//! Photoshoot fan-out.
//!
//! One backend call per angle, issued together and awaited together. Each
//! call is isolated: errors, timeouts, safety blocks and text-only replies
//! become a per-angle failure instead of aborting siblings. The batch fails
//! only when no angle produced an image.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use jstudio_genai::{ContentGenerator, GenerateContentRequest, GenerateContentResponse};
use jstudio_media::decode;
use jstudio_models::{
    AngleSpec, FailureReason, GeneratedImage, GenerationOutcome, GenerationRequest, ShowcaseResult,
    ANGLES,
};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::record_angle_outcome;
use crate::prompt::EncodedInputs;

/// MIME type recorded when the backend omits one.
const DEFAULT_IMAGE_MIME: &str = "image/png";

pub struct ShowcaseOrchestrator {
    generator: Arc<dyn ContentGenerator>,
    model: String,
    angles: Vec<AngleSpec>,
    angle_timeout: Duration,
}

impl ShowcaseOrchestrator {
    pub fn new(generator: Arc<dyn ContentGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
            angles: ANGLES.to_vec(),
            angle_timeout: Duration::from_secs(90),
        }
    }

    pub fn from_config(generator: Arc<dyn ContentGenerator>, config: &PipelineConfig) -> Self {
        Self::new(generator, config.image_model.clone()).with_angle_timeout(config.angle_timeout)
    }

    pub fn with_angles(mut self, angles: &[AngleSpec]) -> Self {
        self.angles = angles.to_vec();
        self
    }

    pub fn with_angle_timeout(mut self, timeout: Duration) -> Self {
        self.angle_timeout = timeout;
        self
    }

    pub fn angles(&self) -> &[AngleSpec] {
        &self.angles
    }

    /// Run every angle and return one outcome per angle, in catalog order.
    pub async fn run(&self, request: &GenerationRequest) -> PipelineResult<Vec<GenerationOutcome>> {
        request.validate().map_err(PipelineError::InvalidRequest)?;
        if self.angles.is_empty() {
            return Err(PipelineError::invalid_request("no angles configured"));
        }

        let inputs = EncodedInputs::from_request(request)?;

        info!(
            angles = self.angles.len(),
            aspect_ratio = %request.aspect_ratio,
            with_background = request.usable_background().is_some(),
            "Starting showcase generation"
        );

        let calls = self
            .angles
            .iter()
            .map(|angle| self.generate_angle(angle, inputs.angle_request(angle)));

        Ok(join_all(calls).await)
    }

    /// Run every angle and apply the partial-success policy.
    pub async fn generate(&self, request: &GenerationRequest) -> PipelineResult<ShowcaseResult> {
        let outcomes = self.run(request).await?;
        aggregate(outcomes)
    }

    async fn generate_angle(&self, angle: &AngleSpec, request: GenerateContentRequest) -> GenerationOutcome {
        let call = self.generator.generate_content(&self.model, &request);

        let outcome = match tokio::time::timeout(self.angle_timeout, call).await {
            Err(_) => GenerationOutcome::failure(
                angle.label,
                FailureReason::Timeout {
                    secs: self.angle_timeout.as_secs(),
                },
            ),
            Ok(Err(e)) => GenerationOutcome::failure(angle.label, FailureReason::backend(e.to_string())),
            Ok(Ok(response)) => match classify_response(angle, &response) {
                Ok(image) => GenerationOutcome::Success(image),
                Err(reason) => GenerationOutcome::failure(angle.label, reason),
            },
        };

        match &outcome {
            GenerationOutcome::Success(image) => {
                debug!(angle = %angle.label, bytes = image.image.len(), "Angle succeeded");
                record_angle_outcome("success");
            }
            GenerationOutcome::Failure(failure) => {
                warn!(angle = %angle.label, reason = %failure.reason, "Angle failed");
                record_angle_outcome(outcome_label(&failure.reason));
            }
        }

        outcome
    }
}

/// Turn a backend response into an image or a failure reason.
///
/// The first inline part with data wins. Without one, a policy finish
/// reason means `SafetyBlocked`; otherwise `NoImageReturned` with any text.
pub fn classify_response(
    angle: &AngleSpec,
    response: &GenerateContentResponse,
) -> Result<GeneratedImage, FailureReason> {
    if let Some(inline) = response.first_inline_image() {
        let bytes = decode(&inline.data)
            .map_err(|e| FailureReason::backend(format!("Invalid image data: {}", e)))?;
        let mime = if inline.mime_type.is_empty() {
            DEFAULT_IMAGE_MIME
        } else {
            inline.mime_type.as_str()
        };
        return Ok(GeneratedImage::new(bytes, mime, angle.label, angle.prompt_suffix));
    }

    debug!(
        angle = %angle.label,
        finish_reason = ?response.finish_reason(),
        has_text = response.first_text().is_some(),
        "Response carried no image"
    );

    if response.is_safety_block() {
        return Err(FailureReason::SafetyBlocked);
    }
    Err(FailureReason::no_image(response.first_text()))
}

/// Split outcomes into successes and failures.
///
/// Zero successes is an error listing each distinct reason once, in
/// first-seen order.
pub fn aggregate(outcomes: Vec<GenerationOutcome>) -> PipelineResult<ShowcaseResult> {
    let mut result = ShowcaseResult::default();
    for outcome in outcomes {
        match outcome {
            GenerationOutcome::Success(image) => result.images.push(image),
            GenerationOutcome::Failure(failure) => result.failures.push(failure),
        }
    }

    if result.images.is_empty() {
        let mut reasons: Vec<String> = Vec::new();
        for failure in &result.failures {
            let reason = failure.reason.to_string();
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
        return Err(PipelineError::GenerationFailed { reasons });
    }

    info!(summary = %result.summary(), "Showcase generation finished");
    Ok(result)
}

fn outcome_label(reason: &FailureReason) -> &'static str {
    match reason {
        FailureReason::SafetyBlocked => "safety_blocked",
        FailureReason::NoImageReturned { .. } => "no_image",
        FailureReason::Timeout { .. } => "timeout",
        FailureReason::Backend { .. } => "backend_error",
    }
}
