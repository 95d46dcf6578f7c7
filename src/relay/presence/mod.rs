//! Presence Tracking
//!
//! Process-local registry of which users currently have at least one live
//! connection.

/// Presence registry implementation
pub mod registry;

pub use registry::PresenceRegistry;
