//! Video generation as a long-running operation.
//!
//! `submit` creates the operation, `poll` refreshes it, and
//! `wait_until_done` drives `sleep -> poll` until the backend reports done.
//! The wait is cancellable and bounded; consecutive poll failures are
//! tolerated up to a cap. Handles are only ever replaced by backend
//! snapshots, never flipped locally.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use jstudio_genai::{PredictLongRunningRequest, VideoGenerator, VideoImage, VideoInstance, VideoParameters};
use jstudio_media::encode_asset;
use jstudio_models::{SourceAsset, VideoAspectRatio, VideoOperationHandle};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::record_video_poll;
use crate::prompt::video_prompt;

/// A downloaded video held in a temporary file.
///
/// The file is removed when this value is dropped unless it is persisted.
#[derive(Debug)]
pub struct GeneratedVideo {
    pub id: Uuid,
    pub prompt: String,
    pub aspect_ratio: VideoAspectRatio,
    file: NamedTempFile,
    size: usize,
}

impl GeneratedVideo {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Move the file to `target`, keeping it past drop.
    pub fn persist(self, target: impl AsRef<Path>) -> PipelineResult<PathBuf> {
        let target = target.as_ref().to_path_buf();
        self.file.persist(&target).map_err(|e| PipelineError::Io(e.error))?;
        Ok(target)
    }
}

pub struct VideoOperationPoller {
    backend: Arc<dyn VideoGenerator>,
    model: String,
    resolution: String,
    poll_interval: Duration,
    poll_timeout: Duration,
    max_poll_failures: u32,
    max_wait: Duration,
    work_dir: PathBuf,
}

impl VideoOperationPoller {
    pub fn new(backend: Arc<dyn VideoGenerator>, model: impl Into<String>) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            backend,
            model: model.into(),
            resolution: defaults.video_resolution,
            poll_interval: defaults.poll_interval,
            poll_timeout: defaults.poll_timeout,
            max_poll_failures: defaults.max_poll_failures,
            max_wait: defaults.max_video_wait,
            work_dir: defaults.work_dir,
        }
    }

    pub fn from_config(backend: Arc<dyn VideoGenerator>, config: &PipelineConfig) -> Self {
        Self {
            backend,
            model: config.video_model.clone(),
            resolution: config.video_resolution.clone(),
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
            max_poll_failures: config.max_poll_failures.max(1),
            max_wait: config.max_video_wait,
            work_dir: config.work_dir.clone(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_max_poll_failures(mut self, max: u32) -> Self {
        self.max_poll_failures = max.max(1);
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Submit a generation request. Never retried.
    pub async fn submit(
        &self,
        image: &SourceAsset,
        prompt: Option<&str>,
        aspect_ratio: VideoAspectRatio,
    ) -> PipelineResult<VideoOperationHandle> {
        let request = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: video_prompt(prompt).to_string(),
                image: Some(VideoImage {
                    bytes_base64_encoded: encode_asset(image)?,
                    mime_type: image.media_type().to_string(),
                }),
            }],
            parameters: VideoParameters {
                aspect_ratio: aspect_ratio.as_str().to_string(),
                resolution: self.resolution.clone(),
                sample_count: 1,
            },
        };

        let operation = self
            .backend
            .start_video(&self.model, &request)
            .await
            .map_err(|e| PipelineError::submission_failed(e.to_string()))?;

        if operation.name.trim().is_empty() {
            return Err(PipelineError::submission_failed(
                "backend returned an operation without a name",
            ));
        }

        info!(operation = %operation.name, aspect_ratio = %aspect_ratio, "Video operation submitted");
        Ok(operation.into_handle())
    }

    /// Fetch a fresh snapshot of `handle` from the backend.
    pub async fn poll(&self, handle: &VideoOperationHandle) -> PipelineResult<VideoOperationHandle> {
        record_video_poll();

        let mut operation = tokio::time::timeout(self.poll_timeout, self.backend.get_operation(handle.name()))
            .await
            .map_err(|_| {
                PipelineError::Timeout(format!(
                    "status poll exceeded {}s",
                    self.poll_timeout.as_secs()
                ))
            })??;

        if operation.name.is_empty() {
            operation.name = handle.name().to_string();
        }
        debug!(operation = %operation.name, done = operation.done, "Polled video operation");
        Ok(operation.into_handle())
    }

    /// Sleep-then-poll until done, cancelled, timed out, or polls keep failing.
    pub async fn wait_until_done(
        &self,
        handle: VideoOperationHandle,
        cancel: &CancelToken,
    ) -> PipelineResult<VideoOperationHandle> {
        let started = Instant::now();
        let mut handle = handle;
        let mut consecutive_failures = 0u32;
        let mut polls = 0u32;

        while !handle.is_done() {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            if started.elapsed() >= self.max_wait {
                return Err(PipelineError::Timeout(format!(
                    "video not ready after {}s",
                    self.max_wait.as_secs()
                )));
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
                res = self.poll(&handle) => res,
            };
            polls += 1;

            match polled {
                Ok(next) => {
                    consecutive_failures = 0;
                    handle = next;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    warn!(
                        operation = %handle.name(),
                        attempt = consecutive_failures,
                        max = self.max_poll_failures,
                        error = %e,
                        "Video status poll failed"
                    );
                    if consecutive_failures >= self.max_poll_failures {
                        return Err(PipelineError::PollFailed {
                            attempts: consecutive_failures,
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            operation = %handle.name(),
            polls,
            elapsed_secs = started.elapsed().as_secs(),
            "Video operation done"
        );
        Ok(handle)
    }

    /// Download the finished asset into a temp file.
    pub async fn resolve(
        &self,
        handle: &VideoOperationHandle,
        prompt: &str,
        aspect_ratio: VideoAspectRatio,
    ) -> PipelineResult<GeneratedVideo> {
        let uri = handle.video_uri().ok_or_else(|| PipelineError::MissingAsset {
            operation: handle.name().to_string(),
            backend_error: handle.error().map(str::to_string),
        })?;

        let bytes = self.backend.download_video(uri).await?;
        if bytes.is_empty() {
            return Err(PipelineError::MissingAsset {
                operation: handle.name().to_string(),
                backend_error: Some("downloaded asset is empty".to_string()),
            });
        }

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let file = tempfile::Builder::new()
            .prefix("jstudio-video-")
            .suffix(".mp4")
            .tempfile_in(&self.work_dir)?;
        tokio::fs::write(file.path(), &bytes).await?;

        info!(operation = %handle.name(), bytes = bytes.len(), path = %file.path().display(), "Video downloaded");

        Ok(GeneratedVideo {
            id: Uuid::new_v4(),
            prompt: prompt.to_string(),
            aspect_ratio,
            file,
            size: bytes.len(),
        })
    }

    /// Submit, wait and resolve in one call.
    pub async fn generate(
        &self,
        image: &SourceAsset,
        prompt: Option<&str>,
        aspect_ratio: VideoAspectRatio,
        cancel: &CancelToken,
    ) -> PipelineResult<GeneratedVideo> {
        let handle = self.submit(image, prompt, aspect_ratio).await?;
        let handle = self.wait_until_done(handle, cancel).await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            video = self.resolve(&handle, video_prompt(prompt), aspect_ratio) => video,
        }
    }
}

impl std::fmt::Debug for VideoOperationPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoOperationPoller")
            .field("model", &self.model)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_failures", &self.max_poll_failures)
            .finish_non_exhaustive()
    }
}
