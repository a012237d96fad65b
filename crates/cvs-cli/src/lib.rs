//! # cvs-cli — Command-Line Interface for the Expiry Engine
//!
//! ## Subcommands
//!
//! - `expiry`: compute expiry dates for a submission file offline
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `cvs-expiry`; no calendar rules here.

pub mod expiry;
