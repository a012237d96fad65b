//! # Prometheus Metrics
//!
//! Request metrics recorded through the `metrics` facade. They are exported
//! at `GET /metrics` when the binary installs a Prometheus recorder; without
//! a recorder the macros are no-ops.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Requests handled, labelled by route and status.
pub const REQUESTS_TOTAL: &str = "cvs_expiry_requests_total";

/// Expiry dates written, labelled by strategy.
pub const DATES_ISSUED_TOTAL: &str = "cvs_expiry_dates_issued_total";

/// Requests answered with a 4xx or 5xx status, labelled by route and status.
pub const ERRORS_TOTAL: &str = "cvs_expiry_errors_total";

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    let status = response.status();

    metrics::counter!(REQUESTS_TOTAL, "path" => path.clone(), "status" => status.as_u16().to_string())
        .increment(1);
    if status.is_client_error() || status.is_server_error() {
        metrics::counter!(ERRORS_TOTAL, "path" => path, "status" => status.as_u16().to_string())
            .increment(1);
    }

    response
}

/// Record one issued expiry date.
pub fn record_issued(strategy: &'static str) {
    metrics::counter!(DATES_ISSUED_TOTAL, "strategy" => strategy).increment(1);
}
