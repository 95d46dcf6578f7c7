/**
 * Room Membership Registry
 *
 * Maps room names to the connections currently joined to them. Rooms are
 * ephemeral: created implicitly on first join, removed when the last member
 * leaves. There is no ownership validation against the persistence layer;
 * any connection can join any room name it knows. Authorization happens in
 * the HTTP API at message-send time, not here at join time.
 *
 * # Personal Rooms
 *
 * Beyond conversation rooms, every connection auto-joins a personal room
 * named by its own user id in string form. "Emit to user N" is therefore
 * just "emit to room `N`", and a user's devices all share that room.
 *
 * # Cleanup
 *
 * A reverse index (connection → rooms) lets `leave_all` clear a closing
 * connection's membership without scanning every room.
 */
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct RoomTables {
    members: HashMap<String, HashSet<Uuid>>,
    joined: HashMap<Uuid, HashSet<String>>,
}

/// Per-process room membership table.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    tables: Mutex<RoomTables>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `conn_id` to `room`, creating the room if needed. Idempotent.
    pub fn join(&self, conn_id: Uuid, room: &str) {
        let mut tables = self.tables.lock().unwrap();
        tables
            .members
            .entry(room.to_string())
            .or_default()
            .insert(conn_id);
        tables
            .joined
            .entry(conn_id)
            .or_default()
            .insert(room.to_string());
        tracing::debug!("[Rooms] {} joined room {}", conn_id, room);
    }

    /// Remove `conn_id` from `room`. Idempotent; empty rooms are dropped.
    pub fn leave(&self, conn_id: Uuid, room: &str) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(members) = tables.members.get_mut(room) {
            members.remove(&conn_id);
            if members.is_empty() {
                tables.members.remove(room);
            }
        }
        if let Some(joined) = tables.joined.get_mut(&conn_id) {
            joined.remove(room);
            if joined.is_empty() {
                tables.joined.remove(&conn_id);
            }
        }
    }

    /// Clear every membership for a closing connection.
    pub fn leave_all(&self, conn_id: Uuid) {
        let mut tables = self.tables.lock().unwrap();
        let Some(rooms) = tables.joined.remove(&conn_id) else {
            return;
        };
        for room in rooms {
            if let Some(members) = tables.members.get_mut(&room) {
                members.remove(&conn_id);
                if members.is_empty() {
                    tables.members.remove(&room);
                }
            }
        }
    }

    pub fn is_member(&self, conn_id: Uuid, room: &str) -> bool {
        self.tables
            .lock()
            .unwrap()
            .members
            .get(room)
            .is_some_and(|members| members.contains(&conn_id))
    }

    /// Connections currently joined to `room` (empty if the room is unknown).
    pub fn members(&self, room: &str) -> Vec<Uuid> {
        self.tables
            .lock()
            .unwrap()
            .members
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.tables.lock().unwrap().members.len()
    }
}
