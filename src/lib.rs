//! VoiceLoop - microphone round-trip client
//!
//! This crate records a clip from the microphone, uploads it to a
//! configured HTTP endpoint, and plays back the audio the server returns.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, and errors
//! - **Application**: The round-trip coordinator and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, reqwest, rodio, config file)
//! - **CLI**: Command-line interface and the interactive runner

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
