//! Audio value objects

pub mod levels;
pub mod payload;

pub use levels::{LevelFrame, LEVEL_FLOOR, LEVEL_SLOTS};
pub use payload::{AudioMimeType, AudioPayload, ServerReply};
