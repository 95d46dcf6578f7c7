/**
 * Server Configuration
 *
 * This module handles loading of relay configuration from environment
 * variables, focusing on the optional Redis connection for the pub/sub
 * bridge.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables, with sensible
 * defaults for local development.
 *
 * # Error Handling
 *
 * Configuration problems are logged but do not prevent startup. When
 * `REDIS_URL` is absent the relay runs on the in-process loopback bridge:
 * fully functional on a single instance, no cross-process fan-out.
 */

/// Relay configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// TCP port for the socket endpoint (`SERVER_PORT`, default 4000)
    pub port: u16,
    /// Instance tag used in log lines (`APP_ID`, default "relay-1")
    pub app_id: String,
    /// Redis connection URL for the pub/sub bridge (`REDIS_URL`, optional)
    pub redis_url: Option<String>,
}

impl RelayConfig {
    /// Load configuration from the environment.
    ///
    /// Never fails: malformed values fall back to defaults with a warning,
    /// and a missing `REDIS_URL` selects the in-process bridge.
    pub fn from_env() -> Self {
        let port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!("[Config] SERVER_PORT '{}' is not a port, using 4000", raw);
                4000
            }),
            Err(_) => 4000,
        };

        let app_id = std::env::var("APP_ID").unwrap_or_else(|_| "relay-1".to_string());

        let redis_url = std::env::var("REDIS_URL").ok();
        if redis_url.is_none() {
            tracing::warn!(
                "[Config] REDIS_URL not set. Cross-process fan-out disabled; \
                 using in-process bridge."
            );
        }

        Self {
            port,
            app_id,
            redis_url,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            app_id: "relay-1".to_string(),
            redis_url: None,
        }
    }
}
