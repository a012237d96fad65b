//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! AppState holds:
//! - **Orchestrator**: the expiry engine, wired to a history source and a
//!   date provider
//! - **Database pool**: present when `DATABASE_URL` is configured; used by
//!   the readiness probe
//! - **Metrics handle**: present when a Prometheus recorder is installed

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use cvs_core::{DateProvider, SystemDateProvider};
use cvs_expiry::{ExpiryOrchestrator, HistoryLookup, InMemoryHistory, TestResultHistory};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default upper bound on pooled Postgres connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Service configuration, read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Postgres connection string (`DATABASE_URL`). When absent the service
    /// reads history from an empty in-memory source.
    pub database_url: Option<String>,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`).
    pub database_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup. Unparseable
    /// numeric values fall back to their defaults; an empty `DATABASE_URL`
    /// counts as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|n| n.trim().parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            port,
            database_url,
            database_max_connections,
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: ExpiryOrchestrator,
    pub db_pool: Option<PgPool>,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("orchestrator", &self.orchestrator)
            .field("db_pool", &self.db_pool.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Create state with default configuration, an empty in-memory history
    /// and the system clock.
    pub fn new() -> Self {
        Self::with_history(
            AppConfig::default(),
            Arc::new(InMemoryHistory::new()),
            Arc::new(SystemDateProvider),
        )
    }

    /// Create state reading history from `source` and dates from `dates`.
    pub fn with_history(
        config: AppConfig,
        source: Arc<dyn TestResultHistory>,
        dates: Arc<dyn DateProvider>,
    ) -> Self {
        Self {
            config,
            orchestrator: ExpiryOrchestrator::new(HistoryLookup::new(source), dates),
            db_pool: None,
            metrics: None,
        }
    }

    /// Attach the database pool used by the readiness probe.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the Prometheus handle rendered at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
