//! Capabilities the pipeline depends on.
//!
//! The orchestration layer is written against these traits so it can be
//! driven by `GeminiClient` in production and by fakes in tests.

use async_trait::async_trait;

use crate::error::GenAiResult;
use crate::types::{GenerateContentRequest, GenerateContentResponse, Operation, PredictLongRunningRequest};

/// Single-shot content generation (images or text).
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenAiResult<GenerateContentResponse>;
}

/// Long-running video generation.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Submit a generation request and return the initial operation.
    async fn start_video(
        &self,
        model: &str,
        request: &PredictLongRunningRequest,
    ) -> GenAiResult<Operation>;

    /// Refresh an operation by name.
    async fn get_operation(&self, name: &str) -> GenAiResult<Operation>;

    /// Download a finished asset, attaching whatever credential the URI needs.
    async fn download_video(&self, uri: &str) -> GenAiResult<Vec<u8>>;
}
