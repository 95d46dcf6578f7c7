//! Realtime Relay
//!
//! The server side of the chat transport: socket connections, presence,
//! conversation rooms, the pub/sub bridge, message/reaction fan-out, and
//! call signaling.
//!
//! # Module Layout
//!
//! - `server`: configuration, state containers, router assembly
//! - `connection`: the socket endpoint and per-connection tasks
//! - `presence`: who is online (refcounted across devices)
//! - `rooms`: conversation, personal, and document room membership
//! - `bridge`: cross-process pub/sub (Redis or in-process loopback)
//! - `messaging`: message/reaction publish and fan-out
//! - `document`: collaborative edit fan-out
//! - `call`: call sessions and WebRTC signaling relay
//! - `error`: the relay error taxonomy

pub mod bridge;
pub mod call;
pub mod connection;
pub mod document;
pub mod error;
pub mod messaging;
pub mod presence;
pub mod rooms;
pub mod server;

pub use error::RelayError;
pub use server::{create_app, AppState, FanoutState, RelayConfig};
