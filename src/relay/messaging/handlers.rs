/**
 * Messaging Event Handlers
 *
 * Client-side of the messaging relay: `send-message` and `react-to-message`
 * stamp the originating socket id and publish to the bridge; conversation
 * join/leave map straight onto room membership.
 *
 * No delivery happens here. Even a message whose only recipient sits on
 * this same process goes out through the bridge and comes back through
 * `delivery::handle_bridge_frame`, keeping one code path for same-process
 * and cross-process traffic.
 */
use crate::relay::bridge::ConversationChannel;
use crate::relay::error::RelayError;
use crate::relay::server::state::AppState;
use crate::shared::{ConversationId, ServerEvent, WireMessage, WireReaction};
use uuid::Uuid;

/// Handle `send-message`: validate recipients, stamp the origin socket,
/// publish on the conversation's message channel.
///
/// A message that resolves to zero recipients is not published; the sender
/// gets a `delivery-error` acknowledgment instead of silence.
pub fn handle_send_message(state: &AppState, conn_id: Uuid, payload: WireMessage) {
    if payload.recipients().is_empty() {
        tracing::warn!(
            "[Relay] send-message from {} with no recipients (conversation {})",
            conn_id,
            payload.conversation_id
        );
        report_delivery_error(state, conn_id, &RelayError::EmptyRecipients);
        return;
    }

    let stamped = payload.with_sender_socket(conn_id);
    let channel = ConversationChannel::message(stamped.conversation_id.clone());
    publish(state, conn_id, &channel, &stamped);
}

/// Handle `react-to-message`: stamp the origin socket and publish on the
/// conversation's reaction channel.
pub fn handle_react_to_message(state: &AppState, conn_id: Uuid, payload: WireReaction) {
    let stamped = payload.with_sender_socket(conn_id);
    let channel = ConversationChannel::reaction(stamped.conversation_id.clone());
    publish(state, conn_id, &channel, &stamped);
}

/// Handle `join-conversation`.
pub fn handle_join_conversation(state: &AppState, conn_id: Uuid, conversation_id: &ConversationId) {
    state.fanout.rooms.join(conn_id, conversation_id.as_str());
}

/// Handle `leave-conversation`.
pub fn handle_leave_conversation(
    state: &AppState,
    conn_id: Uuid,
    conversation_id: &ConversationId,
) {
    state.fanout.rooms.leave(conn_id, conversation_id.as_str());
}

fn publish<T: serde::Serialize>(
    state: &AppState,
    conn_id: Uuid,
    channel: &ConversationChannel,
    payload: &T,
) {
    let json = match serde_json::to_string(payload) {
        Ok(json) => json,
        Err(e) => {
            let error = RelayError::from(e);
            tracing::error!("[Relay] Failed to encode payload for {}: {}", channel, error);
            report_delivery_error(state, conn_id, &error);
            return;
        }
    };
    tracing::debug!("[Relay] {} publishing to {}", state.app_id, channel);
    if let Err(e) = state.bridge.publish(channel, json) {
        tracing::error!("[Relay] Publish to {} failed: {}", channel, e);
        report_delivery_error(state, conn_id, &e);
    }
}

fn report_delivery_error(state: &AppState, conn_id: Uuid, error: &RelayError) {
    state
        .fanout
        .connections
        .send_to(conn_id, &ServerEvent::delivery_error(error.client_message()));
}
