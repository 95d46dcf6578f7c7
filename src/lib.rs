//! RippleChat Relay - Main Library
//!
//! RippleChat's realtime relay: the socket-facing half of a chat application.
//! The relay tracks presence, manages per-conversation rooms, fans messages
//! and reactions out across server processes through a pub/sub bridge, and
//! runs the WebRTC call-signaling state machine.
//!
//! # Overview
//!
//! This library provides the core functionality for the relay, including:
//! - Presence tracking (who is online right now)
//! - Conversation-scoped room membership
//! - Cross-process message/reaction fan-out via Redis pub/sub
//! - Call lifecycle signaling (start/accept/reject/end) and WebRTC
//!   offer/answer/ICE relay
//!
//! Durability is someone else's job: messages are persisted by the HTTP API
//! the client talks to separately, and identity is established by the auth
//! boundary before the socket handshake. The relay only handles live
//! delivery.
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Wire-level types spoken over the socket
//!   - The closed event taxonomy (`ClientEvent` / `ServerEvent`)
//!   - Message, reaction, call, and document payloads
//!
//! - **`relay`** - Server-side relay implementation
//!   - Axum WebSocket endpoint and connection lifecycle
//!   - Presence and room registries
//!   - Pub/sub bridge (Redis or in-process loopback)
//!   - Messaging fan-out, document fan-out, and call signaling
//!
//! # Usage
//!
//! ```rust,no_run
//! use ripplechat::relay::{create_app, RelayConfig};
//!
//! let config = RelayConfig::from_env();
//! let app = create_app(&config);
//! // Serve `app` with Axum
//! ```

/// Wire-level types shared with clients
pub mod shared;

/// Server-side relay implementation
pub mod relay;
