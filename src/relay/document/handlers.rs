/**
 * Document Event Handlers
 *
 * `document:join` puts the connection in the document's room;
 * `document:update` rebroadcasts the new content as `document:updated` to
 * every other connection in that room. The sender is excluded (its editor
 * already holds the content) and the relay does not inspect or merge the
 * edits. Leaving happens implicitly on disconnect with the rest of the
 * connection's rooms.
 */
use crate::relay::server::state::AppState;
use crate::shared::{DocumentUpdate, ServerEvent};
use uuid::Uuid;

/// Room name for a document. Namespaced so document rooms can never
/// collide with conversation or personal rooms.
pub fn document_room(document_id: &str) -> String {
    format!("document:{document_id}")
}

/// Handle `document:join`.
pub fn handle_document_join(state: &AppState, conn_id: Uuid, document_id: &str) {
    state.fanout.rooms.join(conn_id, &document_room(document_id));
}

/// Handle `document:update`: relay the content to the document's other
/// viewers.
pub fn handle_document_update(state: &AppState, conn_id: Uuid, update: DocumentUpdate) {
    let room = document_room(&update.document_id);
    tracing::debug!("[Document] {} updating {}", conn_id, room);
    state.fanout.emit_to_room(
        &room,
        Some(conn_id),
        &ServerEvent::DocumentUpdated {
            content: update.content,
        },
    );
}
