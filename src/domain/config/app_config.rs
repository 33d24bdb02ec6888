//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// Default round-trip timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default playback volume
const DEFAULT_VOLUME: f32 = 1.0;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
///
/// The endpoint deliberately has no default: it must come from the config
/// file, the environment, or the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub capture_dir: Option<String>,
    pub timeout_secs: Option<u64>,
    pub volume: Option<f32>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            endpoint: None,
            capture_dir: None,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            volume: Some(DEFAULT_VOLUME),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            endpoint: other.endpoint.or(self.endpoint),
            capture_dir: other.capture_dir.or(self.capture_dir),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            volume: other.volume.or(self.volume),
        }
    }

    /// Get the endpoint URL, failing when it is not configured
    pub fn endpoint(&self) -> Result<&str, ConfigError> {
        match self.endpoint.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ConfigError::ValidationError {
                key: "endpoint".to_string(),
                message: "no service endpoint configured; set VOICE_LOOP_ENDPOINT, \
                          pass --endpoint, or run 'voice-loop config set endpoint <url>'"
                    .to_string(),
            }),
        }
    }

    /// Get the round-trip timeout in seconds, or the default
    pub fn timeout_secs_or_default(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Get the playback volume in [0.0, 1.0], or the default
    pub fn volume_or_default(&self) -> f32 {
        self.volume.unwrap_or(DEFAULT_VOLUME).clamp(0.0, 1.0)
    }
}
