//! # History Lookup
//!
//! Reads a vehicle's previously submitted test results and folds them into
//! the single "most recent valid expiry" value the strategies consume.
//!
//! The read goes through the [`TestResultHistory`] trait so the engine does
//! not depend on a storage backend. [`InMemoryHistory`] backs the CLI and
//! tests; the API crate provides a Postgres implementation.
//!
//! ## Failure policy
//!
//! A [`HistoryError::Query`] is logged and degraded to the no-history
//! sentinel, so the submission is treated as the vehicle's first qualifying
//! test. A [`HistoryError::Unavailable`] is surfaced as
//! [`ExpiryError::Internal`]. There are no retries.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

use cvs_core::{epoch_zero, no_history_sentinel, parse_date, VehicleKey};

use crate::codes;
use crate::error::{ExpiryError, HistoryError};
use crate::test_result::{HistoricalTestResult, TestStatus};

/// A source of previously submitted test results.
///
/// Implementations must be `Send + Sync` so a single source can be shared
/// by every request handler.
#[async_trait]
pub trait TestResultHistory: Send + Sync {
    /// Fetch every submitted test result for `key` that finished at or
    /// before `until`.
    async fn fetch_submitted_history(
        &self,
        key: &VehicleKey,
        until: DateTime<Utc>,
    ) -> Result<Vec<HistoricalTestResult>, HistoryError>;
}

/// Supplies the most recent valid expiry for a vehicle.
#[derive(Clone)]
pub struct HistoryLookup {
    source: Arc<dyn TestResultHistory>,
}

impl std::fmt::Debug for HistoryLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLookup").finish_non_exhaustive()
    }
}

impl HistoryLookup {
    /// Wrap a history source.
    pub fn new(source: Arc<dyn TestResultHistory>) -> Self {
        Self { source }
    }

    /// The latest qualifying expiry date on record for `key`, or
    /// [`no_history_sentinel()`] when there is none.
    ///
    /// Performs exactly one read against the underlying source.
    ///
    /// # Errors
    ///
    /// Returns [`ExpiryError::Internal`] only when the source reports
    /// [`HistoryError::Unavailable`].
    pub async fn most_recent_expiry(
        &self,
        key: &VehicleKey,
        now: DateTime<Utc>,
    ) -> Result<NaiveDate, ExpiryError> {
        match self.source.fetch_submitted_history(key, now).await {
            Ok(records) => {
                let most_recent = most_recent_valid_expiry(&records);
                tracing::debug!(
                    vehicle = %key,
                    records = records.len(),
                    most_recent_expiry = %most_recent,
                    "history read"
                );
                Ok(most_recent)
            }
            Err(HistoryError::Query(reason)) => {
                tracing::warn!(
                    vehicle = %key,
                    %reason,
                    "history read failed, treating vehicle as having no history"
                );
                Ok(no_history_sentinel())
            }
            Err(err @ HistoryError::Unavailable(_)) => {
                tracing::error!(vehicle = %key, error = %err, "history source unavailable");
                Err(err.into())
            }
        }
    }
}

/// Fold historical records into the maximum qualifying expiry date.
///
/// A historical test type qualifies when its record was submitted, its test
/// code is on the expiry allow-list, and its expiry is a parseable date
/// strictly after the unix epoch. Returns the sentinel when nothing
/// qualifies.
pub fn most_recent_valid_expiry(records: &[HistoricalTestResult]) -> NaiveDate {
    records
        .iter()
        .filter(|record| record.test_status == TestStatus::Submitted)
        .flat_map(|record| record.test_types.iter())
        .filter(|test_type| {
            test_type
                .test_code
                .as_deref()
                .is_some_and(codes::is_expiry_test_code)
        })
        .filter_map(|test_type| test_type.test_expiry_date.as_deref().and_then(parse_date))
        .filter(|expiry| *expiry > epoch_zero())
        .max()
        .unwrap_or_else(no_history_sentinel)
}

// -- In-memory source ---------------------------------------------------------

/// Thread-safe, cloneable in-memory history source.
///
/// Records are matched on system number or VIN according to the key kind.
/// The `RwLock` is `parking_lot` and is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Arc<RwLock<Vec<HistoricalTestResult>>>,
}

impl InMemoryHistory {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source pre-loaded with `records`.
    pub fn with_records(records: Vec<HistoricalTestResult>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Add a record.
    pub fn insert(&self, record: HistoricalTestResult) {
        self.records.write().push(record);
    }

    /// Number of stored records, across all vehicles and statuses.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn matches_key(record: &HistoricalTestResult, key: &VehicleKey) -> bool {
    match key {
        VehicleKey::SystemNumber(sn) => {
            record.system_number.as_deref().map(str::trim) == Some(sn.as_str())
        }
        VehicleKey::Vin(vin) => record
            .vin
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(vin.as_str())),
    }
}

/// Records without a parseable end timestamp are kept.
fn finished_by(record: &HistoricalTestResult, until: DateTime<Utc>) -> bool {
    match record.test_end_timestamp.as_deref() {
        Some(ts) => match DateTime::parse_from_rfc3339(ts) {
            Ok(end) => end.with_timezone(&Utc) <= until,
            Err(_) => parse_date(ts).map_or(true, |day| day <= until.date_naive()),
        },
        None => true,
    }
}

#[async_trait]
impl TestResultHistory for InMemoryHistory {
    async fn fetch_submitted_history(
        &self,
        key: &VehicleKey,
        until: DateTime<Utc>,
    ) -> Result<Vec<HistoricalTestResult>, HistoryError> {
        let guard = self.records.read();
        Ok(guard
            .iter()
            .filter(|r| r.test_status == TestStatus::Submitted)
            .filter(|r| matches_key(r, key))
            .filter(|r| finished_by(r, until))
            .cloned()
            .collect())
    }
}
