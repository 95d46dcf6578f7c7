//! Relay Error Types
//!
//! Error taxonomy for the relay: signaling precondition failures, messaging
//! delivery failures, and bridge connectivity failures.

/// Error type definitions
pub mod types;

pub use types::RelayError;
