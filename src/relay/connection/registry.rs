/**
 * Connection Registry
 *
 * The per-process table of live connections. Each entry pairs a connection
 * id with the user identity from its handshake and an unbounded channel
 * feeding that connection's write task. Handlers never touch a socket
 * directly: they queue `ServerEvent`s here and the write task drains them
 * in order.
 *
 * # Delivery Semantics
 *
 * Queuing to a connection whose receiver has gone away is a silent no-op
 * (the disconnect path is already running). Order is preserved per
 * connection; there is no ordering guarantee across connections.
 */
use crate::shared::{ServerEvent, UserId};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One live connection: identity plus its outbound event queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub conn_id: Uuid,
    pub user_id: UserId,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    fn send(&self, event: &ServerEvent) -> bool {
        self.tx.send(event.clone()).is_ok()
    }
}

/// Table of live connections for this process.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    handles: Mutex<HashMap<Uuid, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and hand back the receiving end of its
    /// outbound queue, to be drained by the connection's write task.
    pub fn register(&self, conn_id: Uuid, user_id: UserId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle {
            conn_id,
            user_id,
            tx,
        };
        self.handles.lock().unwrap().insert(conn_id, handle);
        rx
    }

    pub fn unregister(&self, conn_id: Uuid) -> Option<ConnectionHandle> {
        self.handles.lock().unwrap().remove(&conn_id)
    }

    /// Queue an event to one connection. Returns false if the connection is
    /// unknown or already tearing down.
    pub fn send_to(&self, conn_id: Uuid, event: &ServerEvent) -> bool {
        let handles = self.handles.lock().unwrap();
        match handles.get(&conn_id) {
            Some(handle) => handle.send(event),
            None => false,
        }
    }

    /// Queue an event to every connection except `except`: the
    /// `socket.broadcast.emit` of this relay, used for presence
    /// notifications.
    pub fn broadcast_except(&self, except: Uuid, event: &ServerEvent) {
        let handles = self.handles.lock().unwrap();
        for handle in handles.values() {
            if handle.conn_id != except {
                handle.send(event);
            }
        }
    }

    pub fn user_of(&self, conn_id: Uuid) -> Option<UserId> {
        self.handles
            .lock()
            .unwrap()
            .get(&conn_id)
            .map(|handle| handle.user_id)
    }

    pub fn connection_count(&self) -> usize {
        self.handles.lock().unwrap().len()
    }
}
