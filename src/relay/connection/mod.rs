//! Connection Lifecycle
//!
//! Everything owned per socket: the connection registry (handle table with
//! outbound queues), the WebSocket upgrade endpoint, and the per-connection
//! read/write tasks that drive the rest of the relay.

/// Connection handle table
pub mod registry;

/// WebSocket endpoint and per-connection tasks
pub mod socket;

pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use socket::{attach, detach, dispatch, ws_handler};
