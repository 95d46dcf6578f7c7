//! Call Signaling
//!
//! The call lifecycle (start/accept/reject/end) and WebRTC offer/answer/ICE
//! relay, gated by presence, room membership, and an explicit per-
//! conversation call session. The relay never touches media: once signaling
//! completes, audio and video flow peer-to-peer.

/// Call session records and transitions
pub mod session;

/// Call event handlers
pub mod handlers;

pub use session::{CallRegistry, CallSession, CallState};
