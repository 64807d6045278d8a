use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinedex_api::api::{create_router, AppState};
use cinedex_api::catalog::load_catalog;
use cinedex_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let catalog = load_catalog(&config.movies_csv, &config.credits_csv)
        .context("Failed to load film catalog")?;
    let state = AppState::from_config(catalog, &config);

    if config.eager_index {
        let recommender = Arc::clone(&state.recommender);
        tokio::task::spawn_blocking(move || recommender.index())
            .await
            .context("Index warm-up task failed")?;
    }

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
