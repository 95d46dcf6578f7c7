/**
 * Presence Registry
 *
 * Tracks which user ids currently have at least one live connection to this
 * process. The registry is an explicitly-owned object constructed once at
 * startup and handed to every handler; there is no module-level singleton,
 * so tests can run multiple isolated instances side by side.
 *
 * # Reference Counting
 *
 * A user with two open tabs has two connections but one presence entry.
 * Entries are reference-counted per user id so the invariant holds: a user
 * is online iff at least one of their connections is registered. The
 * transition booleans returned by `mark_online` / `mark_offline` tell the
 * caller when to broadcast `user-connected` / `user-disconnected`.
 *
 * # Known Limitation
 *
 * There is no liveness timeout here. A connection that dies without a clean
 * close leaves its user falsely online until the transport's own keepalive
 * notices the dead socket and runs the disconnect path.
 */
use crate::shared::UserId;
use std::collections::HashMap;
use std::sync::Mutex;

/// Reference-counted set of online users.
///
/// All methods take `&self`; interior mutability via a short-critical-section
/// mutex keeps the registry cheap to share across handlers.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    connections: Mutex<HashMap<UserId, usize>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection for `user_id`.
    ///
    /// Returns `true` when this is the user's first live connection, i.e.
    /// the user just came online.
    pub fn mark_online(&self, user_id: UserId) -> bool {
        let mut connections = self.connections.lock().unwrap();
        let count = connections.entry(user_id).or_insert(0);
        *count += 1;
        let first = *count == 1;
        if first {
            tracing::debug!("[Presence] User {} online", user_id);
        }
        first
    }

    /// Record a closed connection for `user_id`.
    ///
    /// Returns `true` when this was the user's last live connection, i.e.
    /// the user just went offline. Idempotent: unknown users are a no-op.
    pub fn mark_offline(&self, user_id: UserId) -> bool {
        let mut connections = self.connections.lock().unwrap();
        match connections.get_mut(&user_id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                connections.remove(&user_id);
                tracing::debug!("[Presence] User {} offline", user_id);
                true
            }
            None => false,
        }
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.connections.lock().unwrap().contains_key(&user_id)
    }

    /// Current membership, for the `online-users` greeting on connect.
    pub fn snapshot(&self) -> Vec<UserId> {
        self.connections.lock().unwrap().keys().copied().collect()
    }

    pub fn online_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }
}
