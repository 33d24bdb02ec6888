//! HTTP uploader adapter
//!
//! One POST per round trip. The current server contract returns the
//! playable audio bytes directly; replies with a JSON content type are
//! decoded through the legacy envelope for backward compatibility.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use crate::application::ports::{UploadError, Uploader};
use crate::domain::audio::{AudioMimeType, AudioPayload, ServerReply};

use super::multipart::MultipartBody;

/// Filename declared in the multipart part
const UPLOAD_FILENAME: &str = "recording.wav";

/// Legacy server contract: JSON envelope with base64 audio
#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    transcription: Option<String>,
    response_text: Option<String>,
    audio_base64: String,
}

/// Uploader backed by reqwest
pub struct HttpUploader {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpUploader {
    /// Create an uploader for the configured endpoint URL.
    /// Fails when the HTTP client cannot be constructed (e.g. TLS init).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// The configured endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Decode a reply body by content type
    fn decode_reply(content_type: Option<&str>, body: Vec<u8>) -> Result<ServerReply, UploadError> {
        let is_json = content_type
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            return Self::decode_envelope(&body);
        }

        let mime = content_type
            .and_then(AudioMimeType::from_mime)
            .unwrap_or_default();
        Ok(ServerReply::audio_only(AudioPayload::new(body, mime)))
    }

    /// Decode the legacy JSON envelope
    fn decode_envelope(body: &[u8]) -> Result<ServerReply, UploadError> {
        let envelope: ReplyEnvelope = serde_json::from_slice(body)
            .map_err(|e| UploadError::Transport(format!("malformed reply envelope: {}", e)))?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(&envelope.audio_base64)
            .map_err(|e| UploadError::Transport(format!("invalid reply audio encoding: {}", e)))?;

        if audio.is_empty() {
            return Err(UploadError::EmptyResponse);
        }

        Ok(ServerReply {
            audio: AudioPayload::new(audio, AudioMimeType::Wav),
            transcript: envelope.transcription,
            response_text: envelope.response_text,
        })
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(&self, file_path: &Path) -> Result<ServerReply, UploadError> {
        // Fail before any network I/O when the clip cannot be read
        let clip = tokio::fs::read(file_path)
            .await
            .map_err(|e| UploadError::FileUnreadable(format!("{}: {}", file_path.display(), e)))?;

        let body = MultipartBody::new(UPLOAD_FILENAME, AudioMimeType::Wav, &clip);
        let content_type = body.content_type();

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body.into_bytes())
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(UploadError::Transport(format!(
                "HTTP {}: {}",
                status,
                detail.trim()
            )));
        }

        let reply_content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if bytes.is_empty() {
            return Err(UploadError::EmptyResponse);
        }

        Self::decode_reply(reply_content_type.as_deref(), bytes.to_vec())
    }
}
