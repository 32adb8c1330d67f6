//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; installing an exporter is left
//! to the embedding application.

use std::time::Duration;

use jstudio_models::GenerationMode;
use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Per-angle outcomes by `outcome` (success, safety_blocked, no_image, timeout, backend_error).
    pub const ANGLE_OUTCOMES_TOTAL: &str = "jstudio_angle_outcomes_total";

    /// Video status polls issued.
    pub const VIDEO_POLLS_TOTAL: &str = "jstudio_video_polls_total";

    /// Watermark passes by `result` (applied, skipped, failed).
    pub const WATERMARKS_TOTAL: &str = "jstudio_watermarks_total";

    /// End-to-end generation latency by `mode`.
    pub const GENERATION_LATENCY_SECONDS: &str = "jstudio_generation_latency_seconds";
}

pub fn record_angle_outcome(outcome: &'static str) {
    counter!(names::ANGLE_OUTCOMES_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_video_poll() {
    counter!(names::VIDEO_POLLS_TOTAL).increment(1);
}

pub fn record_watermark(result: &'static str) {
    counter!(names::WATERMARKS_TOTAL, "result" => result).increment(1);
}

pub fn record_generation_latency(mode: GenerationMode, elapsed: Duration) {
    histogram!(names::GENERATION_LATENCY_SECONDS, "mode" => mode.as_str())
        .record(elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::ANGLE_OUTCOMES_TOTAL.starts_with("jstudio_"));
        assert!(names::VIDEO_POLLS_TOTAL.contains("polls"));
        assert!(names::GENERATION_LATENCY_SECONDS.ends_with("_seconds"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_angle_outcome("success");
        record_video_poll();
        record_watermark("applied");
        record_generation_latency(GenerationMode::Photo, Duration::from_millis(10));
    }
}
