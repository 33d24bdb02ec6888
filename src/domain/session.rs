//! Capture session state machine

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Capture states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when starting a capture that is already running
#[derive(Debug, Clone, Error)]
#[error("Recording already in progress")]
pub struct AlreadyRecording;

/// Capture session entity.
/// Tracks the lifecycle of the single process-wide recording session.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> IDLE (stop)
///
/// `stop` while idle is a no-op; `start` while recording fails. The path of
/// the last completed capture survives across cycles and failed submits.
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: CaptureState,
    last_capture: Option<PathBuf>,
}

impl CaptureSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            last_capture: None,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), AlreadyRecording> {
        if self.state == CaptureState::Recording {
            return Err(AlreadyRecording);
        }
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Transition to IDLE, remembering the capture path.
    /// Idempotent: stopping while idle changes nothing.
    pub fn stop(&mut self, capture_path: &Path) {
        if self.state == CaptureState::Recording {
            self.state = CaptureState::Idle;
            self.last_capture = Some(capture_path.to_path_buf());
        }
    }

    /// Roll back a failed start without recording a capture path
    pub fn abort(&mut self) {
        self.state = CaptureState::Idle;
    }

    /// Path of the last completed capture, if any.
    /// Valid only after at least one start/stop cycle.
    pub fn last_capture(&self) -> Option<&Path> {
        self.last_capture.as_deref()
    }
}
