/**
 * Application State Management
 *
 * This module defines the relay's state containers and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * Two layers of state exist on purpose:
 *
 * - `FanoutState` is the delivery substrate: presence, rooms, and the
 *   connection table. It is everything the pub/sub bridge's receive path
 *   needs to turn a bridge frame into socket emits, and nothing more.
 * - `AppState` is the full per-process state handed to the socket endpoint:
 *   the fanout substrate plus the call-session registry, the bridge handle,
 *   and the instance tag.
 *
 * The bridge holds a `FanoutState`, not an `AppState`, which keeps the
 * dependency arrow pointing one way: bridge frames can cause emits, but
 * never call-signaling transitions.
 *
 * # Thread Safety
 *
 * All registries use interior mutability with short-critical-section
 * mutexes; no lock is ever held across an await. Both state structs are
 * cheap `Arc` bundles and are cloned freely into handlers and tasks.
 */
use crate::relay::bridge::BridgeHandle;
use crate::relay::call::CallRegistry;
use crate::relay::connection::ConnectionRegistry;
use crate::relay::presence::PresenceRegistry;
use crate::relay::rooms::RoomRegistry;
use crate::shared::{ServerEvent, UserId};
use axum::extract::FromRef;
use std::sync::Arc;
use uuid::Uuid;

/// The delivery substrate: everything needed to route a payload that is
/// already on this process to the right sockets.
#[derive(Clone)]
pub struct FanoutState {
    pub presence: Arc<PresenceRegistry>,
    pub rooms: Arc<RoomRegistry>,
    pub connections: Arc<ConnectionRegistry>,
}

impl FanoutState {
    pub fn new() -> Self {
        Self {
            presence: Arc::new(PresenceRegistry::new()),
            rooms: Arc::new(RoomRegistry::new()),
            connections: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Emit to every member of `room`, optionally excluding one socket
    /// (echo suppression).
    pub fn emit_to_room(&self, room: &str, except: Option<Uuid>, event: &ServerEvent) {
        for member in self.rooms.members(room) {
            if Some(member) == except {
                continue;
            }
            self.connections.send_to(member, event);
        }
    }

    /// Emit to a user's personal room: all of that user's devices, minus an
    /// optionally excluded socket.
    pub fn emit_to_user(&self, user_id: UserId, except: Option<Uuid>, event: &ServerEvent) {
        self.emit_to_room(&user_id.to_string(), except, event);
    }
}

impl Default for FanoutState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-process relay state handed to the socket endpoint.
#[derive(Clone)]
pub struct AppState {
    /// Presence, rooms, and the connection table
    pub fanout: FanoutState,

    /// Active call sessions, keyed by conversation id
    pub calls: Arc<CallRegistry>,

    /// Handle to the pub/sub bridge (Redis or in-process loopback)
    pub bridge: BridgeHandle,

    /// Instance tag for log lines, so interleaved logs from horizontally
    /// scaled relays stay attributable
    pub app_id: Arc<str>,
}

impl AppState {
    pub fn new(fanout: FanoutState, bridge: BridgeHandle, app_id: &str) -> Self {
        Self {
            fanout,
            calls: Arc::new(CallRegistry::new()),
            bridge,
            app_id: Arc::from(app_id),
        }
    }
}

/// Allow handlers to extract the fanout substrate directly from `AppState`.
impl FromRef<AppState> for FanoutState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.fanout.clone()
    }
}

/// Allow handlers to extract the call registry directly from `AppState`.
impl FromRef<AppState> for Arc<CallRegistry> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.calls.clone()
    }
}

/// Allow handlers to extract the bridge handle directly from `AppState`.
impl FromRef<AppState> for BridgeHandle {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.bridge.clone()
    }
}
