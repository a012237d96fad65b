//! # cvs-api — Axum Service for the Expiry Engine
//!
//! Wraps [`cvs_expiry::ExpiryOrchestrator`] in an HTTP service.
//!
//! ## API Surface
//!
//! | Route                          | Module               | Purpose                         |
//! |--------------------------------|----------------------|---------------------------------|
//! | `POST /v1/test-results/expiry` | [`routes::expiry`]   | Populate expiry dates           |
//! | `GET /metrics`                 | [`routes::metrics`]  | Prometheus exposition           |
//! | `GET /health/liveness`         | this module          | Process is up                   |
//! | `GET /health/readiness`        | this module          | Database reachable, if configured |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the metrics middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::expiry::router())
        .merge(routes::metrics::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api).with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the history source can serve reads.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match &state.db_pool {
        Some(pool) => match db::ping(pool).await {
            Ok(()) => (StatusCode::OK, "ready"),
            Err(e) => {
                tracing::warn!(error = %e, "readiness check failed");
                (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
            }
        },
        None => (StatusCode::OK, "ready"),
    }
}
