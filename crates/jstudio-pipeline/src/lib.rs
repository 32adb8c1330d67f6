//! Generation orchestration for the jewelry studio.
//!
//! This crate provides:
//! - `showcase`: concurrent per-angle photoshoot generation with partial-success aggregation
//! - `video`: submit / poll / resolve for long-running video operations
//! - `watermark_stage`: batch watermarking that never fails the batch
//! - `caption`: social caption writer
//! - `studio`: the credit-gated facade used by the CLI

pub mod cancel;
pub mod caption;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod prompt;
pub mod showcase;
pub mod studio;
pub mod video;
pub mod watermark_stage;

pub use cancel::{CancelSource, CancelToken};
pub use caption::{CaptionWriter, FALLBACK_CAPTION};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use prompt::DEFAULT_VIDEO_PROMPT;
pub use showcase::ShowcaseOrchestrator;
pub use studio::Studio;
pub use video::{GeneratedVideo, VideoOperationPoller};
pub use watermark_stage::WatermarkStage;
