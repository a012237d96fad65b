//! # cvs-core — Foundational Types for CVS Test Results
//!
//! This crate is the leaf of the workspace. It defines the primitives the
//! expiry engine and its surrounding services share. Every other crate in
//! the workspace depends on `cvs-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for vehicle identifiers.** `SystemNumber` and `Vin`
//!    are distinct types, and `VehicleKey` records which one a history read
//!    was keyed on.
//!
//! 2. **Single `VehicleType` enum.** One definition, exhaustive `match`
//!    everywhere. Adding a vehicle type forces every consumer to decide
//!    whether it takes part in expiry calculation.
//!
//! 3. **UTC-only calendar.** All date arithmetic runs on `NaiveDate` values
//!    that are interpreted as UTC calendar days. There is no process-wide
//!    timezone default; "now" comes from an explicit [`DateProvider`].
//!
//! 4. **Two distinct epoch values.** [`epoch_zero()`] (1 January 1970) marks
//!    malformed dates; [`no_history_sentinel()`] (1 February 1970) marks a
//!    vehicle with no qualifying history. They never compare equal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cvs-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod calendar;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod vehicle;

// Re-export primary types for ergonomic imports.
pub use calendar::Window;
pub use error::CvsError;
pub use identity::{SystemNumber, VehicleKey, Vin};
pub use temporal::{
    epoch_zero, is_valid_date, no_history_sentinel, parse_date, to_iso8601, DateProvider,
    FixedDateProvider, SystemDateProvider,
};
pub use vehicle::VehicleType;
