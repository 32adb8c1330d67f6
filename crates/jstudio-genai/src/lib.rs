//! Client for the generative backend.
//!
//! This crate provides:
//! - Wire types for `generateContent` and `predictLongRunning` calls
//! - `ContentGenerator` / `VideoGenerator` traits the pipeline is written against
//! - `GeminiClient`, a REST implementation with retry and API-key handling

pub mod backend;
pub mod client;
pub mod error;
pub mod retry;
pub mod types;


pub use backend::{ContentGenerator, VideoGenerator};
pub use client::{GeminiClient, GeminiConfig};
pub use error::{GenAiError, GenAiResult};
pub use retry::RetryConfig;
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Operation, Part, PredictLongRunningRequest, VideoImage, VideoInstance,
    VideoParameters,
};
