//! Test history reads against the `test_results` table.
//!
//! Each row is one stored test result; its `test_types` column holds the
//! JSON array of test types as submitted. Only submitted rows that finished
//! at or before the requested instant are returned.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use cvs_core::VehicleKey;
use cvs_expiry::{HistoricalTestResult, HistoricalTestType, HistoryError, TestResultHistory, TestStatus};

/// Postgres error code for an undefined table.
const UNDEFINED_TABLE: &str = "42P01";

/// Maximum rows returned for one vehicle.
const HISTORY_MAX_ROWS: i64 = 10_000;

const BY_SYSTEM_NUMBER: &str = "SELECT system_number, vin, test_status, test_end_timestamp, test_types
     FROM test_results
     WHERE system_number = $1 AND test_status = 'submitted'
       AND (test_end_timestamp IS NULL OR test_end_timestamp <= $2)
     ORDER BY test_end_timestamp DESC NULLS LAST
     LIMIT $3";

const BY_VIN: &str = "SELECT system_number, vin, test_status, test_end_timestamp, test_types
     FROM test_results
     WHERE upper(vin) = $1 AND test_status = 'submitted'
       AND (test_end_timestamp IS NULL OR test_end_timestamp <= $2)
     ORDER BY test_end_timestamp DESC NULLS LAST
     LIMIT $3";

/// [`TestResultHistory`] backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgTestResultHistory {
    pool: PgPool,
}

impl PgTestResultHistory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TestResultHistory for PgTestResultHistory {
    async fn fetch_submitted_history(
        &self,
        key: &VehicleKey,
        until: DateTime<Utc>,
    ) -> Result<Vec<HistoricalTestResult>, HistoryError> {
        let sql = match key {
            VehicleKey::SystemNumber(_) => BY_SYSTEM_NUMBER,
            VehicleKey::Vin(_) => BY_VIN,
        };
        let rows = sqlx::query_as::<_, TestResultRow>(sql)
            .bind(key.as_str())
            .bind(until)
            .bind(HISTORY_MAX_ROWS)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        rows.into_iter().map(TestResultRow::into_record).collect()
    }
}

/// Map a driver error onto the engine's two failure kinds.
///
/// Configuration faults, a closed pool and a missing table mean the source
/// cannot be used at all. Everything else is a failed read.
pub fn classify(err: sqlx::Error) -> HistoryError {
    let unavailable = match &err {
        sqlx::Error::Configuration(_) | sqlx::Error::PoolClosed => true,
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNDEFINED_TABLE),
        _ => false,
    };
    if unavailable {
        HistoryError::Unavailable(err.to_string())
    } else {
        HistoryError::Query(err.to_string())
    }
}

#[derive(sqlx::FromRow)]
struct TestResultRow {
    system_number: Option<String>,
    vin: Option<String>,
    test_status: String,
    test_end_timestamp: Option<DateTime<Utc>>,
    test_types: Json<Vec<HistoricalTestType>>,
}

impl TestResultRow {
    fn into_record(self) -> Result<HistoricalTestResult, HistoryError> {
        let test_status = parse_status(&self.test_status)?;
        Ok(HistoricalTestResult {
            system_number: self.system_number,
            vin: self.vin,
            test_status,
            test_end_timestamp: self.test_end_timestamp.map(|ts| ts.to_rfc3339()),
            test_types: self.test_types.0,
        })
    }
}

fn parse_status(raw: &str) -> Result<TestStatus, HistoryError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|e| HistoryError::Query(format!("unrecognised test status {raw:?}: {e}")))
}
