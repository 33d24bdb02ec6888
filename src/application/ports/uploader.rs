//! Upload port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::ServerReply;

/// Upload errors
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("Failed to read capture file: {0}")]
    FileUnreadable(String),

    #[error("Upload failed: {0}")]
    Transport(String),

    #[error("Empty response from server")]
    EmptyResponse,
}

/// Port for one multipart upload round trip to the response service.
///
/// The caller is responsible for serializing submits; exactly one upload
/// is in flight per round trip.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Read the clip at `file_path`, POST it as multipart/form-data, and
    /// decode the reply. An unreadable file fails before any network I/O.
    async fn upload(&self, file_path: &Path) -> Result<ServerReply, UploadError>;
}
