//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use jstudio_genai::client::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, DEFAULT_VIDEO_MODEL};
use jstudio_genai::GeminiConfig;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Deadline for a single angle call
    pub angle_timeout: Duration,
    /// Wait between video status polls
    pub poll_interval: Duration,
    /// Deadline for a single status poll
    pub poll_timeout: Duration,
    /// Consecutive failed polls tolerated before giving up
    pub max_poll_failures: u32,
    /// Overall cap on waiting for a video
    pub max_video_wait: Duration,
    pub video_resolution: String,
    /// Directory for downloaded video files
    pub work_dir: PathBuf,
    pub image_model: String,
    pub text_model: String,
    pub video_model: String,
    /// Timeout for fetching example assets and logos
    pub fetch_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            angle_timeout: Duration::from_secs(90),
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(30),
            max_poll_failures: 3,
            max_video_wait: Duration::from_secs(900), // 15 minutes
            video_resolution: "720p".to_string(),
            work_dir: std::env::temp_dir(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            angle_timeout: Duration::from_secs(
                std::env::var("STUDIO_ANGLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(90),
            ),
            poll_interval: Duration::from_secs(
                std::env::var("STUDIO_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            poll_timeout: Duration::from_secs(
                std::env::var("STUDIO_POLL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_poll_failures: std::env::var("STUDIO_MAX_POLL_FAILURES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(3),
            max_video_wait: Duration::from_secs(
                std::env::var("STUDIO_MAX_VIDEO_WAIT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(900),
            ),
            video_resolution: std::env::var("STUDIO_VIDEO_RESOLUTION")
                .unwrap_or_else(|_| "720p".to_string()),
            work_dir: std::env::var("STUDIO_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            ..defaults
        }
    }

    /// Take model names from the backend client config.
    pub fn with_models(mut self, gemini: &GeminiConfig) -> Self {
        self.image_model = gemini.image_model.clone();
        self.text_model = gemini.text_model.clone();
        self.video_model = gemini.video_model.clone();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_from_empty_env() {
        for key in [
            "STUDIO_ANGLE_TIMEOUT_SECS",
            "STUDIO_POLL_INTERVAL_SECS",
            "STUDIO_MAX_POLL_FAILURES",
            "STUDIO_VIDEO_RESOLUTION",
        ] {
            std::env::remove_var(key);
        }
        let config = PipelineConfig::from_env();
        assert_eq!(config.angle_timeout, Duration::from_secs(90));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_poll_failures, 3);
        assert_eq!(config.video_resolution, "720p");
        assert_eq!(config.video_model, DEFAULT_VIDEO_MODEL);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("STUDIO_POLL_INTERVAL_SECS", "2");
        std::env::set_var("STUDIO_MAX_POLL_FAILURES", "0");
        std::env::set_var("STUDIO_WORK_DIR", "/var/tmp/jstudio");
        let config = PipelineConfig::from_env();
        std::env::remove_var("STUDIO_POLL_INTERVAL_SECS");
        std::env::remove_var("STUDIO_MAX_POLL_FAILURES");
        std::env::remove_var("STUDIO_WORK_DIR");

        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_poll_failures, 3);
        assert_eq!(config.work_dir, PathBuf::from("/var/tmp/jstudio"));
    }

    #[test]
    fn test_with_models() {
        let mut gemini = GeminiConfig::new("k");
        gemini.image_model = "img-x".to_string();
        let config = PipelineConfig::default().with_models(&gemini);
        assert_eq!(config.image_model, "img-x");
    }
}
