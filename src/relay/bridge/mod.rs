//! Pub/Sub Bridge
//!
//! Cross-process fan-out for conversation traffic. A relay never delivers a
//! client-originated message directly: it publishes to the bridge, and the
//! bridge's receive path (the same code on every instance, including the
//! publishing one) turns the frame into socket emits. One code path for
//! same-process and cross-process delivery.
//!
//! # Backends
//!
//! - **Redis** (`redis_pubsub`): PSUBSCRIBE on the `conversation:*` wildcard
//!   plus a multiplexed publish connection, with reconnect-with-backoff and
//!   a logged dead-letter path for publishes that fail after retries.
//! - **Local** (`local`): in-process loopback used when no `REDIS_URL` is
//!   configured and by the test suite. Publishes dispatch straight into the
//!   receive path.
//!
//! Delivery is at-most-once: the bridge does not buffer, retry delivery, or
//! order across channels. Within one publisher and one channel, order is
//! whatever the backend preserves (FIFO for Redis pub/sub).

/// Channel key scheme
pub mod channel;

/// In-process loopback backend
pub mod local;

/// Redis pub/sub backend
pub mod redis_pubsub;

pub use channel::{ChannelKind, ConversationChannel, CHANNEL_PATTERN};

use crate::relay::error::RelayError;
use local::LocalBridge;
use redis_pubsub::RedisBridge;

/// Handle to whichever bridge backend this process runs.
///
/// Publishing is fire-and-forget from the caller's perspective: an `Err`
/// means the frame was not handed to the backend (and the caller should
/// surface a delivery error), while a successful hand-off still only
/// promises at-most-once delivery.
#[derive(Clone)]
pub enum BridgeHandle {
    Local(LocalBridge),
    Redis(RedisBridge),
}

impl BridgeHandle {
    pub fn publish(&self, channel: &ConversationChannel, payload: String) -> Result<(), RelayError> {
        match self {
            Self::Local(bridge) => bridge.publish(channel, payload),
            Self::Redis(bridge) => bridge.publish(channel, payload),
        }
    }

    /// Whether the backend currently has a live connection. The local
    /// loopback is always connected.
    pub fn is_connected(&self) -> bool {
        match self {
            Self::Local(_) => true,
            Self::Redis(bridge) => bridge.is_connected(),
        }
    }
}
