//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the microphone, HTTP service, and output device.

pub mod capture;
pub mod config;
pub mod playback;
pub mod upload;

// Re-export adapters
pub use capture::CpalCapture;
pub use config::XdgConfigStore;
pub use playback::RodioPlayer;
pub use upload::HttpUploader;
