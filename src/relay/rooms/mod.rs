//! Room Membership
//!
//! Conversation-scoped broadcast groups. A room is named by the string form
//! of a conversation id; every connection additionally sits in a personal
//! room named by its own user id.

/// Room membership registry
pub mod registry;

pub use registry::RoomRegistry;
