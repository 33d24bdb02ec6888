//! Application layer - Use cases and port interfaces
//!
//! Contains the round-trip coordination logic and trait definitions
//! for external system interactions.

pub mod coordinator;
pub mod ports;

// Re-export use cases
pub use coordinator::{RoundTripError, RoundTripOutput, SessionCoordinator};
