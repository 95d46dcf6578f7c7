//! Relay Server
//!
//! Process-level wiring: configuration from the environment, the shared
//! state containers, and router construction (socket endpoint plus health
//! probe).

/// Environment configuration
pub mod config;

/// Router construction and bridge selection
pub mod init;

/// State containers and Axum `FromRef` extraction
pub mod state;

pub use config::RelayConfig;
pub use init::create_app;
pub use state::{AppState, FanoutState};
