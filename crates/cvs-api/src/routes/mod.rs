//! # API Route Modules
//!
//! - `expiry`: expiry-date computation for submitted test results.
//! - `metrics`: Prometheus exposition.

pub mod expiry;
pub mod metrics;
