//! Audio capture port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Recording already in progress")]
    AlreadyRecording,
}

/// The input power an idle or silent capture reports, in dBFS
pub const SILENCE_DB: f32 = -60.0;

/// Port for the process-wide microphone capture resource.
///
/// Implementations own the single capture device handle and the fixed file
/// the clip is written to. Only one recording may run at a time.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Acquire the input device and begin writing the capture file,
    /// overwriting any prior capture. Enables level metering.
    async fn start(&self) -> Result<(), CaptureError>;

    /// Halt writing and release the device. Idempotent.
    async fn stop(&self);

    /// The fixed path the capture file is written to
    fn capture_path(&self) -> PathBuf;

    /// Instantaneous input power in dBFS.
    /// Returns [`SILENCE_DB`] while not recording.
    fn power_db(&self) -> f32;
}

/// Blanket implementation for boxed capture types
#[async_trait]
impl AudioCapture for Box<dyn AudioCapture> {
    async fn start(&self) -> Result<(), CaptureError> {
        self.as_ref().start().await
    }

    async fn stop(&self) {
        self.as_ref().stop().await
    }

    fn capture_path(&self) -> PathBuf {
        self.as_ref().capture_path()
    }

    fn power_db(&self) -> f32 {
        self.as_ref().power_db()
    }
}
