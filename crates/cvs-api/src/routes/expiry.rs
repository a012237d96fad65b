//! # Test Result Expiry API
//!
//! Computes expiry dates for a submitted test result. The response is the
//! submitted payload with `testExpiryDate` populated on every eligible test
//! type; all other fields are echoed back unchanged.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use cvs_expiry::TestResult;

use crate::error::AppError;
use crate::middleware::metrics::record_issued;
use crate::state::AppState;

/// Build the expiry router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/test-results/expiry", post(compute_expiry))
}

/// POST /v1/test-results/expiry: Populate expiry dates on a test result.
async fn compute_expiry(
    State(state): State<AppState>,
    body: Result<Json<TestResult>, JsonRejection>,
) -> Result<Json<TestResult>, AppError> {
    let Json(payload) = body.map_err(|err| AppError::Validation(err.body_text()))?;

    let outcome = state.orchestrator.evaluate(&payload).await?;
    for issued in &outcome.issued {
        record_issued(issued.strategy.as_str());
    }

    Ok(Json(outcome.payload))
}
