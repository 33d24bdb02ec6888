//! Playback port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::audio::AudioPayload;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Reply is not playable audio: {0}")]
    DecodeFailed(String),

    #[error("Failed to initialize playback: {0}")]
    InitFailed(String),
}

/// Temp-file cleanup errors. Logged by implementations, never propagated.
#[derive(Debug, Clone, Error)]
pub enum CleanupError {
    #[error("Failed to delete temp playback file: {0}")]
    DeleteFailed(String),
}

/// Handle to an in-progress playback.
///
/// Resolves when the platform reports playback completion, whether it
/// succeeded or failed partway. By then the implementation has already
/// deleted its temp file.
#[derive(Debug)]
pub struct PlaybackHandle {
    finished: oneshot::Receiver<()>,
}

impl PlaybackHandle {
    /// Create a handle from the completion channel
    pub fn new(finished: oneshot::Receiver<()>) -> Self {
        Self { finished }
    }

    /// Wait for playback to complete
    pub async fn finished(self) {
        // A dropped sender still means playback is over
        let _ = self.finished.await;
    }
}

/// Port for playing one reply clip through the output device.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Materialize `audio` as the fixed temp playback file (overwriting any
    /// previous one), start playing it, and return once playback has
    /// started. The temp file is deleted exactly once per cycle, on
    /// completion or on any failure.
    async fn play(&self, audio: AudioPayload) -> Result<PlaybackHandle, PlaybackError>;
}
