//! Mercantil console server
//!
//! Run with: cargo run -p mercantil-console

use anyhow::Context;
use mercantil_config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mercantil=debug,tower_http=info,info")),
        )
        .init();

    let config = Config::load().context("loading configuration")?;
    info!(api = %config.api.base_url, "Starting Mercantil console");

    let bind = config.server.bind.clone();
    let state = mercantil_console::state::AppState::new(&config)?;
    let app = mercantil_console::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    info!("Console listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
