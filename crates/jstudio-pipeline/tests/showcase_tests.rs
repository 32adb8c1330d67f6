//! Showcase fan-out behavior against a scripted backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jstudio_genai::types::{Candidate, Content, Part};
use jstudio_genai::{
    ContentGenerator, GenAiError, GenAiResult, GenerateContentRequest, GenerateContentResponse,
};
use jstudio_models::{
    FailureReason, GenerationOutcome, GenerationRequest, ImageAspectRatio, SourceAsset, ANGLES,
};
use jstudio_pipeline::{PipelineError, ShowcaseOrchestrator};

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Clone)]
enum Reply {
    Image(&'static str),
    Safety,
    Text(&'static str),
    Error(u16),
    Hang,
}

/// Replies keyed by the angle's shot-type text found in the prompt.
struct ScriptedGenerator {
    replies: HashMap<&'static str, Reply>,
    calls: AtomicUsize,
    models: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(replies: [Reply; 3]) -> Arc<Self> {
        let replies = ANGLES
            .iter()
            .map(|a| a.label)
            .zip(replies)
            .collect();
        Arc::new(Self {
            replies,
            calls: AtomicUsize::new(0),
            models: Mutex::new(Vec::new()),
        })
    }
}

fn candidate(parts: Vec<Part>, finish: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content { role: None, parts }),
            finish_reason: Some(finish.to_string()),
        }],
        prompt_feedback: None,
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenAiResult<GenerateContentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models.lock().unwrap().push(model.to_string());

        let prompt = request.contents[0]
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<String>();
        let angle = ANGLES
            .iter()
            .find(|a| prompt.contains(a.prompt_suffix))
            .expect("prompt names an angle");

        match self.replies[angle.label].clone() {
            Reply::Image(data) => Ok(candidate(vec![Part::inline("image/png", data)], "STOP")),
            Reply::Safety => Ok(candidate(vec![], "SAFETY")),
            Reply::Text(text) => Ok(candidate(vec![Part::text(text)], "STOP")),
            Reply::Error(status) => Err(GenAiError::from_http_status(status, "backend down")),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!()
            }
        }
    }
}

fn request() -> GenerationRequest {
    GenerationRequest::new(
        SourceAsset::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg"),
        "Model with dark hair, black dress",
    )
    .with_aspect_ratio(ImageAspectRatio::Square)
}

fn orchestrator(backend: Arc<ScriptedGenerator>) -> ShowcaseOrchestrator {
    ShowcaseOrchestrator::new(backend, "gemini-2.5-flash-image")
        .with_angle_timeout(Duration::from_millis(200))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_middle_angle_safety_block_returns_other_two_in_order() {
    let backend = ScriptedGenerator::new([Reply::Image("AQ=="), Reply::Safety, Reply::Image("Ag==")]);
    let result = orchestrator(backend.clone()).generate(&request()).await.unwrap();

    let angles: Vec<&str> = result.images.iter().map(|i| i.angle.as_str()).collect();
    assert_eq!(angles, vec!["Close-up", "Lifestyle"]);
    assert_eq!(result.images[0].image, vec![1]);
    assert_eq!(result.images[1].image, vec![2]);

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].angle, "Full body");
    assert_eq!(result.failures[0].reason, FailureReason::SafetyBlocked);
    assert_eq!(result.summary(), "2 of 3 shots generated");
    assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_all_succeed() {
    let backend = ScriptedGenerator::new([Reply::Image("AQ=="), Reply::Image("Ag=="), Reply::Image("Aw==")]);
    let result = orchestrator(backend.clone()).generate(&request()).await.unwrap();
    assert_eq!(result.images.len(), 3);
    assert!(result.failures.is_empty());
    assert!(!result.is_partial());
    assert!(backend
        .models
        .lock()
        .unwrap()
        .iter()
        .all(|m| m == "gemini-2.5-flash-image"));
}

#[tokio::test]
async fn test_all_fail_aggregates_distinct_reasons() {
    let backend = ScriptedGenerator::new([Reply::Safety, Reply::Text("I cannot draw people"), Reply::Safety]);
    let err = orchestrator(backend).generate(&request()).await.unwrap_err();

    match &err {
        PipelineError::GenerationFailed { reasons } => assert_eq!(
            reasons,
            &vec![
                "Blocked by safety filters.".to_string(),
                "Model returned text instead of image: I cannot draw people...".to_string(),
            ]
        ),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Generation failed: Blocked by safety filters., Model returned text instead of image: I cannot draw people..."
    );
}

#[tokio::test]
async fn test_backend_error_isolated_to_its_angle() {
    let backend = ScriptedGenerator::new([Reply::Error(400), Reply::Image("AQ=="), Reply::Text("")]);
    let outcomes = orchestrator(backend).run(&request()).await.unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        &outcomes[0],
        GenerationOutcome::Failure(f) if matches!(f.reason, FailureReason::Backend { .. })
    ));
    assert!(outcomes[1].is_success());
    match &outcomes[2] {
        GenerationOutcome::Failure(f) => assert_eq!(f.reason.to_string(), "No image generated."),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_angle_times_out_without_blocking_others() {
    let backend = ScriptedGenerator::new([Reply::Image("AQ=="), Reply::Hang, Reply::Image("Ag==")]);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator(backend).generate(&request()),
    )
    .await
    .expect("fan-out bounded by the per-angle timeout")
    .unwrap();

    assert_eq!(result.images.len(), 2);
    assert!(matches!(result.failures[0].reason, FailureReason::Timeout { .. }));
}

#[tokio::test]
async fn test_invalid_request_makes_no_calls() {
    let backend = ScriptedGenerator::new([Reply::Image("AQ=="), Reply::Image("AQ=="), Reply::Image("AQ==")]);
    let bad = GenerationRequest::new(SourceAsset::new(vec![1], "image/png"), "   ");
    let err = orchestrator(backend.clone()).generate(&bad).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidRequest(_)));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}
