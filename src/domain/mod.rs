//! Domain layer - Core business logic
//!
//! Contains value objects, the capture session state machine, and domain
//! errors. This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod session;

// Re-export common types
pub use audio::{AudioMimeType, AudioPayload, LevelFrame, ServerReply};
pub use config::AppConfig;
pub use error::*;
pub use session::{CaptureSession, CaptureState};
