/**
 * Server Initialization
 *
 * Builds the relay's Axum application: pick the bridge backend from
 * configuration, assemble the state containers, and mount the routes.
 *
 * # Routes
 *
 * - `GET /ws`: the WebSocket endpoint (identity via `?id=`)
 * - `GET /health`: liveness probe reporting bridge connectivity and
 *   connection counts
 *
 * # Bridge Selection
 *
 * With `REDIS_URL` set, the Redis backend is spawned and the relay
 * participates in cross-process fan-out; the subscriber task reconnects
 * with backoff on its own. Without it, the in-process loopback bridge
 * keeps a single instance fully functional.
 */
use crate::relay::bridge::{local::LocalBridge, redis_pubsub::RedisBridge, BridgeHandle};
use crate::relay::connection::ws_handler;
use crate::relay::server::config::RelayConfig;
use crate::relay::server::state::{AppState, FanoutState};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

/// Assemble the relay application from configuration.
pub fn create_app(config: &RelayConfig) -> Router {
    let fanout = FanoutState::new();
    let bridge = match &config.redis_url {
        Some(url) => {
            tracing::info!("[Init] Bridging conversations through Redis");
            BridgeHandle::Redis(RedisBridge::spawn(url.clone(), fanout.clone()))
        }
        None => {
            tracing::info!("[Init] Using in-process bridge (single instance)");
            BridgeHandle::Local(LocalBridge::new(fanout.clone()))
        }
    };

    let state = AppState::new(fanout, bridge, &config.app_id);
    tracing::info!("[Init] Relay instance {} ready", state.app_id);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(state)
}

/// Liveness probe. `bridgeConnected` is false while the Redis backend is
/// between reconnect attempts.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut body = serde_json::json!({
        "status": "ok",
        "appId": state.app_id.as_ref(),
        "bridgeConnected": state.bridge.is_connected(),
        "connections": state.fanout.connections.connection_count(),
        "onlineUsers": state.fanout.presence.online_count(),
    });
    if let BridgeHandle::Redis(bridge) = &state.bridge {
        use std::sync::atomic::Ordering;
        let metrics = bridge.metrics();
        body["bridge"] = serde_json::json!({
            "published": metrics.published.load(Ordering::Relaxed),
            "received": metrics.received.load(Ordering::Relaxed),
            "publishErrors": metrics.publish_errors.load(Ordering::Relaxed),
            "reconnects": metrics.reconnects.load(Ordering::Relaxed),
        });
    }
    Json(body)
}
