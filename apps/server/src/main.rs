//! # Stockbook
//!
//! HTTP server for the inventory tracker.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  init_tracing()        RUST_LOG or "info,stockbook=debug,sqlx=warn"    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppConfig::load()     defaults → stockbook.toml → STOCKBOOK_* env     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  open_store()          SQLite + snapshot cache (or cache only)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  axum::serve ──────────► until Ctrl+C / SIGTERM                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockbook_server::{open_store, router, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Stockbook server...");

    let config = AppConfig::load(None).context("Failed to load configuration")?;
    info!(
        bind = %config.bind_address(),
        storage = %config.storage.mode,
        utc_offset_minutes = config.report.utc_offset_minutes,
        "Configuration loaded"
    );

    let store = open_store(&config).await;
    let bind = config.bind_address();
    let state = Arc::new(AppState::new(store, config));

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(addr = %bind, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockbook=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
