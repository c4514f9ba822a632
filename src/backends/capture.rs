use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Frame;

/// Which camera to prefer when more than one is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacingPreference {
    #[default]
    Environment,
    User,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The user (or platform) refused camera access. Fatal to session start.
    #[error("camera access denied")]
    Denied,
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("frame capture failed: {0}")]
    Failed(String),
}

/// Camera seam. Implementations may block; the engine always calls them from
/// a blocking worker.
pub trait CaptureBackend: Send + Sync {
    /// Open the camera stream. Called once per session, before the first
    /// frame is requested.
    fn acquire_stream(&self, facing: FacingPreference) -> Result<(), CaptureError>;

    /// The most recent full frame from the stream.
    fn current_frame(&self) -> Result<Frame, CaptureError>;

    /// Close the stream. Releasing an already-released stream is a no-op.
    fn release_stream(&self);
}
