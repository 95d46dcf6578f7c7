/**
 * Call Event Handlers
 *
 * Client-side of call signaling. Unlike messaging, nothing here touches the
 * bridge: call events resolve against this process's presence, room, and
 * session registries and are emitted directly to the target user's personal
 * room.
 *
 * Every precondition failure goes back to the initiating socket as a
 * `call-error` carrying the exact string deployed clients match on; the
 * other party is never notified of a failed attempt.
 *
 * The acting identity is always the connection's authenticated user id.
 * Payload fields naming the actor are advisory at best and are ignored.
 */
use crate::relay::error::RelayError;
use crate::relay::server::state::AppState;
use crate::shared::{CallAnswer, CallRequest, ServerEvent, UserId, WebRtcSignal};
use uuid::Uuid;

/// Handle `call-start`: verify the callee is online, the caller is in the
/// conversation room, and the conversation has no active call, then create
/// a ringing session and deliver `incoming-call` to the callee's devices.
pub fn handle_call_start(state: &AppState, conn_id: Uuid, caller: UserId, request: CallRequest) {
    if !state.fanout.presence.is_online(request.to_user_id) {
        emit_call_error(state, conn_id, &RelayError::OfflineRecipient);
        return;
    }
    if !state
        .fanout
        .rooms
        .is_member(conn_id, request.conversation_id.as_str())
    {
        emit_call_error(state, conn_id, &RelayError::NotInConversation);
        return;
    }
    if let Err(e) = state
        .calls
        .ring(&request.conversation_id, caller, request.to_user_id)
    {
        emit_call_error(state, conn_id, &e);
        return;
    }

    state.fanout.emit_to_user(
        request.to_user_id,
        None,
        &ServerEvent::IncomingCall {
            from_user_id: caller,
            conversation_id: request.conversation_id,
        },
    );
}

/// Handle `call-accept`: transition the callee's ringing session to
/// accepted and notify the caller. The notification target comes from the
/// session record, not from the payload.
pub fn handle_call_accept(state: &AppState, conn_id: Uuid, callee: UserId, answer: CallAnswer) {
    match state.calls.accept(answer.conversation_id.as_ref(), callee) {
        Ok(caller) => {
            state.fanout.emit_to_user(
                caller,
                None,
                &ServerEvent::CallAccepted {
                    from_user_id: callee,
                },
            );
        }
        Err(e) => emit_call_error(state, conn_id, &e),
    }
}

/// Handle `call-reject`: dispose the callee's ringing session and notify
/// the caller.
pub fn handle_call_reject(state: &AppState, conn_id: Uuid, callee: UserId, answer: CallAnswer) {
    match state.calls.reject(answer.conversation_id.as_ref(), callee) {
        Ok(caller) => {
            state.fanout.emit_to_user(
                caller,
                None,
                &ServerEvent::CallRejected {
                    from_user_id: callee,
                },
            );
        }
        Err(e) => emit_call_error(state, conn_id, &e),
    }
}

/// Handle `call-end`: dispose the conversation's session, if any, and tell
/// the other party the call is over.
///
/// Hang-up is unconditional. A client may end a call the relay no longer
/// has a session for (e.g. after a process restart), and the peer's UI
/// still needs to close, so `call-ended` is delivered regardless.
pub fn handle_call_end(state: &AppState, user_id: UserId, request: CallRequest) {
    if state.calls.end(&request.conversation_id).is_none() {
        tracing::debug!(
            "[Call] {} ended conversation {} with no active session",
            user_id,
            request.conversation_id
        );
    }
    state.fanout.emit_to_user(
        request.to_user_id,
        None,
        &ServerEvent::CallEnded {
            from_user_id: user_id,
        },
    );
}

/// Handle `webrtc-offer`.
pub fn handle_webrtc_offer(state: &AppState, conn_id: Uuid, from: UserId, signal: WebRtcSignal) {
    let Some(offer) = signal.offer.clone() else {
        tracing::warn!("[Call] webrtc-offer from {} without an offer body", from);
        return;
    };
    relay_signal(state, conn_id, from, &signal, |from, conversation_id| {
        ServerEvent::WebrtcOffer {
            offer,
            from_user_id: from,
            conversation_id,
        }
    });
}

/// Handle `webrtc-answer`.
pub fn handle_webrtc_answer(state: &AppState, conn_id: Uuid, from: UserId, signal: WebRtcSignal) {
    let Some(answer) = signal.answer.clone() else {
        tracing::warn!("[Call] webrtc-answer from {} without an answer body", from);
        return;
    };
    relay_signal(state, conn_id, from, &signal, |from, conversation_id| {
        ServerEvent::WebrtcAnswer {
            answer,
            from_user_id: from,
            conversation_id,
        }
    });
}

/// Handle `webrtc-ice`.
pub fn handle_webrtc_ice(state: &AppState, conn_id: Uuid, from: UserId, signal: WebRtcSignal) {
    let Some(candidate) = signal.candidate.clone() else {
        tracing::warn!("[Call] webrtc-ice from {} without a candidate body", from);
        return;
    };
    relay_signal(state, conn_id, from, &signal, |from, conversation_id| {
        ServerEvent::WebrtcIce {
            candidate,
            from_user_id: from,
            conversation_id,
        }
    });
}

/// Notify each peer of the disconnecting user's active calls that the call
/// is over, and dispose the sessions. Runs when a user's last connection
/// closes.
pub fn handle_user_offline(state: &AppState, user_id: UserId) {
    for session in state.calls.end_for_user(user_id) {
        let peer = session.peer_of(user_id);
        tracing::info!(
            "[Call] Ending conversation {} call: {} disconnected, notifying {}",
            session.conversation_id,
            user_id,
            peer
        );
        state.fanout.emit_to_user(
            peer,
            None,
            &ServerEvent::CallEnded {
                from_user_id: user_id,
            },
        );
    }
}

/// Forward an SDP/ICE body to the peer, gated on an accepted session
/// between exactly these two users for this conversation.
fn relay_signal(
    state: &AppState,
    conn_id: Uuid,
    from: UserId,
    signal: &WebRtcSignal,
    build: impl FnOnce(UserId, crate::shared::ConversationId) -> ServerEvent,
) {
    if !state
        .calls
        .is_accepted_between(&signal.conversation_id, from, signal.to_user_id)
    {
        emit_call_error(state, conn_id, &RelayError::NoActiveCall);
        return;
    }
    state.fanout.emit_to_user(
        signal.to_user_id,
        None,
        &build(from, signal.conversation_id.clone()),
    );
}

fn emit_call_error(state: &AppState, conn_id: Uuid, error: &RelayError) {
    tracing::warn!("[Call] Signaling error on {}: {}", conn_id, error);
    state
        .fanout
        .connections
        .send_to(conn_id, &ServerEvent::call_error(error.client_message()));
}
