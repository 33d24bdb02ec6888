//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Config keys accepted by `config set` / `config get`
pub const VALID_CONFIG_KEYS: &[&str] = &["endpoint", "capture_dir", "timeout_secs", "volume"];

/// Check whether a config key is recognized
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// VoiceLoop - voice round-trip client
#[derive(Parser, Debug)]
#[command(name = "voice-loop")]
#[command(version)]
#[command(about = "Record a voice clip, upload it, and play back the service's reply")]
#[command(long_about = None)]
pub struct Cli {
    /// Service endpoint URL (required; no default)
    #[arg(short = 'e', long, value_name = "URL", env = "VOICE_LOOP_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Directory the capture file is written to
    #[arg(long, value_name = "DIR")]
    pub capture_dir: Option<String>,

    /// Round-trip timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Reply playback volume (0.0 - 1.0)
    #[arg(long, value_name = "VOLUME")]
    pub volume: Option<f32>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}
