//! Long-running video operation handle.

use serde::{Deserialize, Serialize};

/// Lifecycle of a video operation. Transitions only from `Pending` to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Pending,
    Done,
}

/// Snapshot of a backend long-running operation.
///
/// Handles are only produced from backend responses (submission or a
/// poll); nothing in the pipeline flips `done` locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOperationHandle {
    name: String,
    done: bool,
    video_uri: Option<String>,
    error: Option<String>,
}

impl VideoOperationHandle {
    /// Build a handle from a backend operation snapshot.
    pub fn from_backend(
        name: impl Into<String>,
        done: bool,
        video_uri: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            done,
            video_uri: video_uri.filter(|u| !u.is_empty()),
            error,
        }
    }

    /// Backend operation name (e.g. `models/veo/operations/abc`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn state(&self) -> OperationState {
        if self.done {
            OperationState::Done
        } else {
            OperationState::Pending
        }
    }

    /// Retrievable asset locator, present once done.
    pub fn video_uri(&self) -> Option<&str> {
        self.video_uri.as_deref()
    }

    /// Backend-reported operation error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
