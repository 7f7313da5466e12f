//! # certreg-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the certificate registry.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use certreg_api::config::{AppConfig, LogFormat};
use certreg_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(config.log_format);
    tracing::info!(?config, "configuration loaded");

    let port = config.port;
    let state = AppState::with_config(config).context("creating registry")?;
    let app = certreg_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("certificate registry listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
