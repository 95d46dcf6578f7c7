/**
 * Bridge-Receipt Fan-Out
 *
 * The receiving half of the messaging relay. Every frame that arrives off
 * the bridge, whether published by this process or any other, lands here
 * and is turned into socket emits:
 *
 * - **Messages** are presence-routed: recipients are resolved from the
 *   payload, filtered to those currently online on this process, and each
 *   gets the frame in their personal room, excluding the originating socket
 *   (echo suppression; the sender's *other* devices still receive it).
 * - **Reactions** are room-routed: every connection currently joined to the
 *   conversation room receives the frame, the originating socket included.
 *
 * Undeliverable frames (unknown channel, undecodable payload, offline
 * recipients) are logged and dropped; at-most-once means there is nobody
 * left to negatively acknowledge on the receive side.
 */
use crate::relay::bridge::{ChannelKind, ConversationChannel};
use crate::relay::server::state::FanoutState;
use crate::shared::{ServerEvent, WireMessage, WireReaction};

/// Demultiplex one raw bridge frame by channel key.
pub fn handle_bridge_frame(fanout: &FanoutState, channel: &str, payload: &str) {
    let Some(parsed) = ConversationChannel::parse(channel) else {
        tracing::warn!("[Relay] Frame on unrecognized channel {}", channel);
        return;
    };

    match parsed.kind {
        ChannelKind::Message => match serde_json::from_str::<WireMessage>(payload) {
            Ok(message) => deliver_message(fanout, message),
            Err(e) => {
                tracing::warn!("[Relay] Undecodable message on {}: {}", channel, e);
            }
        },
        ChannelKind::Reaction => match serde_json::from_str::<WireReaction>(payload) {
            Ok(reaction) => deliver_reaction(fanout, &parsed, reaction),
            Err(e) => {
                tracing::warn!("[Relay] Undecodable reaction on {}: {}", channel, e);
            }
        },
    }
}

fn deliver_message(fanout: &FanoutState, message: WireMessage) {
    let recipients = message.recipients();
    if recipients.is_empty() {
        tracing::debug!(
            "[Relay] Dropping message for conversation {} with no recipients",
            message.conversation_id
        );
        return;
    }

    let online: Vec<_> = recipients
        .into_iter()
        .filter(|id| fanout.presence.is_online(*id))
        .collect();
    if online.is_empty() {
        tracing::debug!(
            "[Relay] No online recipients for conversation {}",
            message.conversation_id
        );
        return;
    }

    let except = message.sender_socket_id;
    let event = ServerEvent::ReceiveMessage(message);
    for recipient in online {
        fanout.emit_to_user(recipient, except, &event);
    }
}

fn deliver_reaction(fanout: &FanoutState, channel: &ConversationChannel, reaction: WireReaction) {
    // Room routing keys off the channel, not the payload body: the channel
    // is what the publisher actually addressed.
    let room = channel.conversation_id.as_str();
    let event = ServerEvent::ReceiveReaction(reaction);
    fanout.emit_to_room(room, None, &event);
}
