// src/main.rs
use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kasho::{create_router, load_env_file, AppConfig};

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    // Optional env file path as the only argument, otherwise `.env`.
    let env_path = std::env::args().nth(1).map(PathBuf::from);
    let env_file = load_env_file(env_path.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match env_file {
        Ok(Some(path)) => tracing::info!("Loaded environment from {}", path.display()),
        Ok(None) => tracing::debug!("No env file found, using process environment"),
        Err(e) => tracing::warn!("Ignoring unreadable env file: {e}"),
    }

    let config = AppConfig::from_env()?;

    let app = create_router(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!(
        "Starting Kasho API v{} on {}",
        env!("CARGO_PKG_VERSION"),
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // ---
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
