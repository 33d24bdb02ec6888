//! Audio payload value object

use std::fmt;

/// Supported audio MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Wav,
    M4a,
    Mp3,
    Ogg,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::M4a => "audio/m4a",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    /// Map a MIME type string to a known variant, if recognized
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.split(';').next().unwrap_or("").trim() {
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/m4a" | "audio/mp4" => Some(Self::M4a),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/ogg" => Some(Self::Ogg),
            _ => None,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AudioMimeType {
    fn default() -> Self {
        Self::Wav
    }
}

/// Value object for one audio clip: raw container bytes plus MIME type.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioPayload {
    /// Create a payload from raw bytes
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

/// Decoded service response for one round trip.
///
/// The current server contract returns the playable audio bytes directly;
/// the legacy JSON envelope additionally carried the transcription and the
/// response text, which surface here when present.
#[derive(Debug, Clone)]
pub struct ServerReply {
    pub audio: AudioPayload,
    pub transcript: Option<String>,
    pub response_text: Option<String>,
}

impl ServerReply {
    /// Reply carrying only audio (the raw-bytes server contract)
    pub fn audio_only(audio: AudioPayload) -> Self {
        Self {
            audio,
            transcript: None,
            response_text: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str() {
        assert_eq!(AudioMimeType::Wav.as_str(), "audio/wav");
        assert_eq!(AudioMimeType::M4a.as_str(), "audio/m4a");
        assert_eq!(AudioMimeType::Mp3.as_str(), "audio/mpeg");
    }

    #[test]
    fn mime_type_extension() {
        assert_eq!(AudioMimeType::Wav.extension(), "wav");
        assert_eq!(AudioMimeType::M4a.extension(), "m4a");
        assert_eq!(AudioMimeType::Ogg.extension(), "ogg");
    }

    #[test]
    fn from_mime_recognizes_variants() {
        assert_eq!(AudioMimeType::from_mime("audio/wav"), Some(AudioMimeType::Wav));
        assert_eq!(AudioMimeType::from_mime("audio/x-wav"), Some(AudioMimeType::Wav));
        assert_eq!(AudioMimeType::from_mime("audio/mp3"), Some(AudioMimeType::Mp3));
        assert_eq!(AudioMimeType::from_mime("text/html"), None);
    }

    #[test]
    fn from_mime_ignores_parameters() {
        assert_eq!(
            AudioMimeType::from_mime("audio/wav; charset=binary"),
            Some(AudioMimeType::Wav)
        );
    }

    #[test]
    fn default_mime_type_is_wav() {
        assert_eq!(AudioMimeType::default(), AudioMimeType::Wav);
    }

    #[test]
    fn payload_size() {
        let payload = AudioPayload::new(vec![0u8; 1024], AudioMimeType::Wav);
        assert_eq!(payload.size_bytes(), 1024);
    }

    #[test]
    fn human_readable_size_bytes() {
        let payload = AudioPayload::new(vec![0u8; 500], AudioMimeType::Wav);
        assert_eq!(payload.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let payload = AudioPayload::new(vec![0u8; 2048], AudioMimeType::Wav);
        assert_eq!(payload.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let payload = AudioPayload::new(vec![0u8; 2 * 1024 * 1024], AudioMimeType::Wav);
        assert_eq!(payload.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn audio_only_reply_has_no_text() {
        let reply = ServerReply::audio_only(AudioPayload::new(vec![1, 2], AudioMimeType::Wav));
        assert!(reply.transcript.is_none());
        assert!(reply.response_text.is_none());
        assert_eq!(reply.audio.data(), &[1, 2]);
    }
}
