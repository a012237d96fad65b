//! # Error Types
//!
//! Defines the error type shared by the CVS crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Date errors carry the offending input verbatim so that a rejected
//! submission can be traced back to the field that caused it.

use thiserror::Error;

/// Top-level error type for the foundational CVS types.
#[derive(Error, Debug)]
pub enum CvsError {
    /// A date string could not be interpreted as a calendar date.
    #[error("invalid date {input:?}: {reason}")]
    InvalidDate {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A value failed domain validation (unknown vehicle type, empty VIN).
    #[error("validation error: {0}")]
    Validation(String),
}
