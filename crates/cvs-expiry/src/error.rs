//! # Expiry Engine Errors
//!
//! Two layers, matching where each failure is decided:
//!
//! - [`HistoryError`] is what a history source reports. A `Query` failure is
//!   absorbed by the history lookup, which degrades to "no history". An
//!   `Unavailable` failure means the data source itself cannot be used and is
//!   surfaced.
//! - [`ExpiryError`] is what the orchestrator returns to its caller.

use thiserror::Error;

/// Errors reported by a [`TestResultHistory`](crate::history::TestResultHistory) source.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The read was attempted and failed (timeout, malformed row, transient
    /// driver error).
    #[error("history query failed: {0}")]
    Query(String),

    /// The data source cannot be reached at all (misconfiguration, closed
    /// pool, missing table).
    #[error("history source unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the expiry orchestrator.
#[derive(Error, Debug)]
pub enum ExpiryError {
    /// The submission cannot be processed as given, e.g. it carries neither
    /// a system number nor a VIN to read history for.
    #[error("invalid submission: {0}")]
    Validation(String),

    /// Generic internal fault. The message is for logs; callers map this to
    /// a transport-level internal error without exposing it.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<HistoryError> for ExpiryError {
    fn from(err: HistoryError) -> Self {
        Self::Internal(err.to_string())
    }
}
