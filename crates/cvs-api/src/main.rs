//! # cvs-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the expiry engine.
//! Binds to configurable port (default 8080).

use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;

use cvs_api::db::history::PgTestResultHistory;
use cvs_api::state::{AppConfig, AppState};
use cvs_core::SystemDateProvider;
use cvs_expiry::{InMemoryHistory, TestResultHistory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    // Initialize database pool (optional, absent means in-memory history).
    let db_pool = cvs_api::db::init_pool(&config).await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let history: Arc<dyn TestResultHistory> = match &db_pool {
        Some(pool) => Arc::new(PgTestResultHistory::new(pool.clone())),
        None => Arc::new(InMemoryHistory::new()),
    };

    let mut state = AppState::with_history(config.clone(), history, Arc::new(SystemDateProvider))
        .with_metrics(metrics);
    if let Some(pool) = db_pool {
        state = state.with_db_pool(pool);
    }

    let app = cvs_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("CVS expiry API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
