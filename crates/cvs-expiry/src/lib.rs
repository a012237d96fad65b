//! # cvs-expiry — Annual Test Expiry Engine
//!
//! Issues roadworthiness-test expiry dates for buses and coaches (PSV),
//! heavy goods vehicles (HGV) and trailers (TRL) once a test is submitted.
//!
//! ## Pipeline
//!
//! ```text
//! ExpiryOrchestrator
//!   ├─ HistoryLookup ── TestResultHistory (one async read per submission)
//!   └─ for each eligible test type
//!        ExpiryContext ──▶ ExpiryStrategy::select ──▶ ExpiryStrategy::compute
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`codes`] | Fixed code sets: expiry allow-list, COIF, first-test and annual-test identifiers |
//! | [`test_result`] | Submission and history payload shapes |
//! | [`history`] | History source trait, most-recent-expiry fold, in-memory source |
//! | [`context`] | Per-entry calculation input |
//! | [`strategy`] | Strategy selection and the six calendar rules |
//! | [`orchestrator`] | End-to-end processing of one submission |
//!
//! Strategies are pure: given an [`ExpiryContext`] and a test date they
//! always return the same result. The only I/O is the single history read.

pub mod codes;
pub mod context;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod strategy;
pub mod test_result;

pub use context::ExpiryContext;
pub use error::{ExpiryError, HistoryError};
pub use history::{most_recent_valid_expiry, HistoryLookup, InMemoryHistory, TestResultHistory};
pub use orchestrator::{ExpiryOrchestrator, ExpiryOutcome, IssuedExpiry};
pub use strategy::ExpiryStrategy;
pub use test_result::{
    HistoricalTestResult, HistoricalTestType, TestOutcome, TestResult, TestStatus, TestTypeEntry,
};
