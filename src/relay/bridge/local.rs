/**
 * In-Process Bridge Backend
 *
 * Loopback backend for single-instance deployments (no `REDIS_URL`) and for
 * tests. A publish is dispatched synchronously into the same bridge-receipt
 * path the Redis subscriber feeds, so messaging behavior is identical with
 * and without Redis, minus cross-process fan-out.
 */
use super::channel::ConversationChannel;
use crate::relay::error::RelayError;
use crate::relay::messaging::delivery::handle_bridge_frame;
use crate::relay::server::state::FanoutState;

/// Loopback bridge: publish and receive collapsed into one call.
#[derive(Clone)]
pub struct LocalBridge {
    fanout: FanoutState,
}

impl LocalBridge {
    pub fn new(fanout: FanoutState) -> Self {
        Self { fanout }
    }

    pub fn publish(&self, channel: &ConversationChannel, payload: String) -> Result<(), RelayError> {
        handle_bridge_frame(&self.fanout, &channel.to_string(), &payload);
        Ok(())
    }
}
