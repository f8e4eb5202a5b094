//! earthlings server entry point.
//!
//! Loads configuration, builds the character cache from the upstream catalog
//! and only then binds the HTTP listener. Any failure before that point exits
//! the process without serving.
//! Logs go to stderr as JSON.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use earthlings_core::AppConfig;

mod error;
mod routes;
mod state;

use error::StartupError;
use state::AppState;

const DEFAULT_LOG_FILTER: &str = "earthlings_server=info,earthlings_core=info,earthlings_client=info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(std::io::stderr)
        .json()
        .init();

    if let Err(err) = run().await {
        tracing::error!(code = err.code(), error = %err, "earthlings server failed to start");
        return Err(err.into());
    }

    Ok(())
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;

    tracing::info!("Loading character data from {}", config.base_url);
    let state = AppState::initialize(&config).await?;

    let app = routes::router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    tracing::info!("Starting server on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
