//! Shared data models for the jewelry studio pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Source assets and generation requests
//! - The fixed photoshoot angle catalog
//! - Per-angle generation outcomes
//! - Watermark specifications
//! - Long-running video operation handles
//! - User profiles, permissions and studio configuration

pub mod angle;
pub mod aspect;
pub mod asset;
pub mod config;
pub mod generation;
pub mod profile;
pub mod social;
pub mod video;
pub mod watermark;

// Re-export common types
pub use angle::{AngleSpec, ANGLES};
pub use aspect::{AspectRatioParseError, ImageAspectRatio, VideoAspectRatio};
pub use asset::SourceAsset;
pub use config::{ExampleAsset, FeatureToggles, StudioConfig};
pub use generation::{
    AngleFailure, FailureReason, GeneratedImage, GenerationOutcome, GenerationRequest,
    ShowcaseResult,
};
pub use profile::{GenerationMode, Profile, UserPermissions, UserRole};
pub use social::SocialLanguage;
pub use video::{OperationState, VideoOperationHandle};
pub use watermark::{WatermarkKind, WatermarkPosition, WatermarkSpec};
