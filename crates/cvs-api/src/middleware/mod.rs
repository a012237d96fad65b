//! # HTTP Middleware
//!
//! - `metrics`: Prometheus request and error counters.

pub mod metrics;
