//! Shared Module
//!
//! This module contains the types spoken on the wire between the relay and
//! its clients. Everything here is plain serde data: the closed socket event
//! taxonomy and the message, reaction, call-signaling, and document payloads.
//!
//! # Overview
//!
//! The shared module is deliberately free of server machinery so a Rust
//! client could reuse it as-is. All types serialize to the JSON shapes the
//! web client already speaks.

/// Socket event taxonomy and payload types
pub mod event;

/// Re-export commonly used types for convenience
pub use event::{
    CallAnswer, CallRequest, ClientEvent, ConversationId, DocumentUpdate, ServerEvent, UserId,
    WebRtcSignal, WireMessage, WireReaction,
};
