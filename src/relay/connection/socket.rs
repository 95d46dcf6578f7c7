/**
 * WebSocket Endpoint
 *
 * `GET /ws?id=<user id>` upgrades to a WebSocket and drives the whole
 * connection lifecycle:
 *
 * 1. Handshake: the `id` query parameter is the user identity. Missing or
 *    non-numeric ids are rejected with 400 before the upgrade.
 * 2. Attach: the connection registers its outbound queue, auto-joins its
 *    user's personal room, and bumps presence. The first device of a user
 *    broadcasts `user-connected`; every new connection gets the
 *    `online-users` snapshot.
 * 3. Steady state: a write task drains the outbound queue into the socket
 *    while the read loop parses inbound frames into `ClientEvent`s and
 *    dispatches them. Dispatch is synchronous, so a connection's events are
 *    handled in arrival order, run to completion.
 * 4. Detach: on close or error, room membership and the registry entry are
 *    cleared, presence drops, the last device broadcasts
 *    `user-disconnected`, and any calls the user was in are ended toward
 *    the peer.
 *
 * Identity is trusted as-is from the query string; authenticating it is the
 * fronting proxy's job.
 */
use crate::relay::error::RelayError;
use crate::relay::server::state::AppState;
use crate::relay::{call, document, messaging};
use crate::shared::{ClientEvent, ServerEvent, UserId};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// Handshake query parameters.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// User identity, numeric. Sent as a string by every client stack.
    pub id: String,
}

/// `GET /ws` upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    let user_id: UserId = match query.id.parse() {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(
                "[Socket] Rejecting handshake with non-numeric id {:?}",
                query.id
            );
            return (StatusCode::BAD_REQUEST, "id must be a numeric user id").into_response();
        }
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: UserId) {
    let conn_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let mut outbound = attach(&state, conn_id, user_id);

    let mut write_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("[Socket] Failed to encode outbound event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let read_state = state.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => dispatch(&read_state, conn_id, user_id, text.as_str()),
                Message::Close(_) => break,
                // Ping/Pong are answered by the websocket layer; binary
                // frames are not part of the protocol.
                _ => {}
            }
        }
    });

    // Either side finishing means the connection is done.
    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    detach(&state, conn_id, user_id);
}

/// Register the connection and run the connect choreography. Returns the
/// outbound queue for the write task.
pub fn attach(state: &AppState, conn_id: Uuid, user_id: UserId) -> UnboundedReceiver<ServerEvent> {
    let outbound = state.fanout.connections.register(conn_id, user_id);
    state.fanout.rooms.join(conn_id, &user_id.to_string());

    if state.fanout.presence.mark_online(user_id) {
        state
            .fanout
            .connections
            .broadcast_except(conn_id, &ServerEvent::UserConnected(user_id));
    }
    state.fanout.connections.send_to(
        conn_id,
        &ServerEvent::OnlineUsers(state.fanout.presence.snapshot()),
    );

    tracing::info!(
        "[Socket] {} connected as user {} ({} users online)",
        conn_id,
        user_id,
        state.fanout.presence.online_count()
    );
    outbound
}

/// Tear the connection down. Safe against double invocation: every step is
/// idempotent.
pub fn detach(state: &AppState, conn_id: Uuid, user_id: UserId) {
    state.fanout.rooms.leave_all(conn_id);
    state.fanout.connections.unregister(conn_id);

    if state.fanout.presence.mark_offline(user_id) {
        state
            .fanout
            .connections
            .broadcast_except(conn_id, &ServerEvent::UserDisconnected(user_id));
        call::handlers::handle_user_offline(state, user_id);
    }

    tracing::info!(
        "[Socket] {} disconnected (user {}, {} users online)",
        conn_id,
        user_id,
        state.fanout.presence.online_count()
    );
}

/// Parse one inbound frame and route it to its handler.
///
/// A frame that does not parse as a `ClientEvent` is logged and dropped;
/// one bad frame never affects the connection or its neighbors.
pub fn dispatch(state: &AppState, conn_id: Uuid, user_id: UserId, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            let error = RelayError::malformed(e.to_string());
            tracing::warn!("[Socket] Dropping frame from {}: {}", conn_id, error);
            return;
        }
    };

    match event {
        ClientEvent::SendMessage(message) => {
            messaging::handlers::handle_send_message(state, conn_id, message);
        }
        ClientEvent::ReactToMessage(reaction) => {
            messaging::handlers::handle_react_to_message(state, conn_id, reaction);
        }
        ClientEvent::JoinConversation(conversation_id) => {
            messaging::handlers::handle_join_conversation(state, conn_id, &conversation_id);
        }
        ClientEvent::LeaveConversation(conversation_id) => {
            messaging::handlers::handle_leave_conversation(state, conn_id, &conversation_id);
        }
        ClientEvent::CallStart(request) => {
            call::handlers::handle_call_start(state, conn_id, user_id, request);
        }
        ClientEvent::CallAccept(answer) => {
            call::handlers::handle_call_accept(state, conn_id, user_id, answer);
        }
        ClientEvent::CallReject(answer) => {
            call::handlers::handle_call_reject(state, conn_id, user_id, answer);
        }
        ClientEvent::CallEnd(request) => {
            call::handlers::handle_call_end(state, user_id, request);
        }
        ClientEvent::WebrtcOffer(signal) => {
            call::handlers::handle_webrtc_offer(state, conn_id, user_id, signal);
        }
        ClientEvent::WebrtcAnswer(signal) => {
            call::handlers::handle_webrtc_answer(state, conn_id, user_id, signal);
        }
        ClientEvent::WebrtcIce(signal) => {
            call::handlers::handle_webrtc_ice(state, conn_id, user_id, signal);
        }
        ClientEvent::DocumentJoin(document_id) => {
            document::handlers::handle_document_join(state, conn_id, &document_id);
        }
        ClientEvent::DocumentUpdate(update) => {
            document::handlers::handle_document_update(state, conn_id, update);
        }
    }
}
