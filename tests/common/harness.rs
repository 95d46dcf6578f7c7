//! In-process relay fixture
//!
//! Runs the relay on the loopback bridge with simulated connections: a
//! `TestClient` is attached through the same connect choreography a real
//! socket goes through, sends raw JSON frames through the same dispatch
//! path, and reads its outbound queue directly instead of a socket.

use ripplechat::relay::bridge::{local::LocalBridge, BridgeHandle};
use ripplechat::relay::connection::{attach, detach, dispatch};
use ripplechat::relay::server::{AppState, FanoutState};
use ripplechat::shared::{ServerEvent, UserId};
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// One relay process under test.
pub struct TestRelay {
    pub state: AppState,
}

impl TestRelay {
    pub fn new() -> Self {
        let fanout = FanoutState::new();
        let bridge = BridgeHandle::Local(LocalBridge::new(fanout.clone()));
        Self {
            state: AppState::new(fanout, bridge, "relay-test"),
        }
    }

    /// Open a simulated connection for `user_id`. The client's queue will
    /// already hold the `online-users` greeting (and nothing else).
    pub fn connect(&self, user_id: UserId) -> TestClient {
        let conn_id = Uuid::new_v4();
        let rx = attach(&self.state, conn_id, user_id);
        TestClient {
            state: self.state.clone(),
            conn_id,
            user_id,
            rx,
        }
    }
}

impl Default for TestRelay {
    fn default() -> Self {
        Self::new()
    }
}

/// A simulated client connection.
pub struct TestClient {
    state: AppState,
    pub conn_id: Uuid,
    pub user_id: UserId,
    rx: UnboundedReceiver<ServerEvent>,
}

impl TestClient {
    /// Send one raw frame, exactly as it would arrive off the socket.
    pub fn send(&self, frame: serde_json::Value) {
        dispatch(&self.state, self.conn_id, self.user_id, &frame.to_string());
    }

    pub fn join(&self, conversation: &str) {
        self.send(serde_json::json!({
            "event": "join-conversation",
            "data": conversation
        }));
    }

    /// Next queued event, if any.
    pub fn next_event(&mut self) -> Option<ServerEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain and return everything currently queued.
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Run the disconnect teardown for this connection.
    pub fn disconnect(self) {
        detach(&self.state, self.conn_id, self.user_id);
    }
}
