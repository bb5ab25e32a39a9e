pub mod auth;
pub mod config;
pub mod error;
pub mod listings;
pub mod maps;
pub mod models;
pub mod state;
pub mod store;
pub mod web;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

/// Build the state, bind and serve until ctrl-c or SIGTERM
pub async fn start_server(config: Config) -> Result<()> {
    let address = config.bind_address();
    let public_url = config.public_url.clone();

    let state = AppState::new(config)?;
    if state.is_mock() {
        warn!("No Google credentials configured, running in mock mode");
    }
    let app = web::router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Enspired listening on {} ({})", address, public_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
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
}
