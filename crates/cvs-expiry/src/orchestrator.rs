//! # Expiry Orchestrator
//!
//! Entry point of the engine. Given a submitted test result, it reads the
//! vehicle's history once, then computes and writes an expiry date for every
//! eligible test type in submission order.
//!
//! ```text
//! TestResult ──▶ gate (status, vehicle type, eligible entries)
//!            ──▶ HistoryLookup (one read)
//!            ──▶ per entry: ExpiryContext ──▶ ExpiryStrategy::select ──▶ compute
//!            ──▶ TestResult (copy, with testExpiryDate populated)
//! ```
//!
//! The input payload is never mutated. Payloads that are not submitted, are
//! for a vehicle type outside PSV/HGV/TRL, or contain no eligible entries are
//! returned unchanged and no history read is made.

use std::sync::Arc;

use serde::Serialize;

use cvs_core::{to_iso8601, DateProvider, VehicleKey};

use crate::context::ExpiryContext;
use crate::error::ExpiryError;
use crate::history::HistoryLookup;
use crate::strategy::ExpiryStrategy;
use crate::test_result::{TestResult, TestStatus};

/// One expiry date written by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedExpiry {
    /// Position of the entry in `testTypes`.
    pub index: usize,
    /// Test type identifier of the entry.
    pub test_type_id: String,
    /// Strategy that produced the date.
    pub strategy: ExpiryStrategy,
    /// The date written, ISO 8601.
    pub test_expiry_date: String,
}

/// Result of one orchestration: the output payload plus what was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryOutcome {
    /// Copy of the input with expiry dates populated.
    pub payload: TestResult,
    /// Dates issued, in entry order. Empty when the payload was passed
    /// through unchanged.
    pub issued: Vec<IssuedExpiry>,
}

/// Computes expiry dates for submitted test results.
#[derive(Clone)]
pub struct ExpiryOrchestrator {
    history: HistoryLookup,
    dates: Arc<dyn DateProvider>,
}

impl std::fmt::Debug for ExpiryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryOrchestrator")
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl ExpiryOrchestrator {
    /// Create an orchestrator reading history through `history` and taking
    /// the test date from `dates`.
    pub fn new(history: HistoryLookup, dates: Arc<dyn DateProvider>) -> Self {
        Self { history, dates }
    }

    /// Return a copy of `payload` with expiry dates populated.
    ///
    /// # Errors
    ///
    /// See [`ExpiryOrchestrator::evaluate`].
    pub async fn apply(&self, payload: &TestResult) -> Result<TestResult, ExpiryError> {
        self.evaluate(payload).await.map(|outcome| outcome.payload)
    }

    /// Compute expiry dates for `payload` and report what was issued.
    ///
    /// # Errors
    ///
    /// - [`ExpiryError::Validation`] when eligible entries exist but the
    ///   payload has no usable system number or VIN.
    /// - [`ExpiryError::Internal`] when the history source is unavailable.
    pub async fn evaluate(&self, payload: &TestResult) -> Result<ExpiryOutcome, ExpiryError> {
        if payload.test_status != TestStatus::Submitted {
            tracing::debug!(status = ?payload.test_status, "payload not submitted, skipping");
            return Ok(unchanged(payload));
        }
        if !payload.vehicle_type.is_expiry_eligible() {
            tracing::debug!(vehicle_type = %payload.vehicle_type, "vehicle type not issued expiry dates");
            return Ok(unchanged(payload));
        }
        if !payload.test_types.iter().any(|entry| entry.is_expiry_eligible()) {
            tracing::debug!("no eligible test types");
            return Ok(unchanged(payload));
        }

        let key = VehicleKey::resolve(payload.system_number.as_deref(), payload.vin.as_deref())
            .map_err(|e| ExpiryError::Validation(e.to_string()))?;

        let now = self.dates.now();
        let today = now.date_naive();
        let most_recent_expiry = self.history.most_recent_expiry(&key, now).await?;

        let mut output = payload.clone();
        let mut issued = Vec::new();

        for (index, entry) in output.test_types.iter_mut().enumerate() {
            if !entry.is_expiry_eligible() {
                continue;
            }
            let ctx = ExpiryContext::new(payload, entry, most_recent_expiry);
            let Some(strategy) = ExpiryStrategy::select(&ctx) else {
                continue;
            };
            let expiry = to_iso8601(strategy.compute(&ctx, today));

            tracing::debug!(
                vehicle = %key,
                test_type_id = %entry.test_type_id,
                %strategy,
                has_history = ctx.has_history(),
                expiry = %expiry,
                "expiry computed"
            );

            entry.test_expiry_date = Some(expiry.clone());
            issued.push(IssuedExpiry {
                index,
                test_type_id: entry.test_type_id.clone(),
                strategy,
                test_expiry_date: expiry,
            });
        }

        tracing::info!(
            vehicle = %key,
            vehicle_type = %payload.vehicle_type,
            %today,
            issued = issued.len(),
            "expiry dates issued"
        );

        Ok(ExpiryOutcome {
            payload: output,
            issued,
        })
    }
}

fn unchanged(payload: &TestResult) -> ExpiryOutcome {
    ExpiryOutcome {
        payload: payload.clone(),
        issued: Vec::new(),
    }
}
