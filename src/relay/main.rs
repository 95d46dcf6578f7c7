/**
 * Relay Server Entry Point
 *
 * Loads environment configuration, initializes tracing, assembles the
 * application, and serves it. `RUST_LOG` controls log verbosity (default
 * `info`); see `server::config` for the rest of the environment surface.
 */
use ripplechat::relay::{create_app, RelayConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::from_env();
    let app = create_app(&config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("[Main] Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("[Main] Relay listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("[Main] Server error: {}", e);
    }
}
