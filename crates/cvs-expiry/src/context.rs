//! # Expiry Context
//!
//! The per-entry input to strategy selection and computation. One context
//! is built for each eligible test type and dropped once its expiry date is
//! written; contexts are never shared between entries.

use chrono::NaiveDate;
use serde::Serialize;

use cvs_core::{no_history_sentinel, parse_date, temporal, VehicleType};

use crate::test_result::{TestResult, TestTypeEntry};

/// Everything a strategy needs to compute one expiry date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryContext {
    /// Vehicle type of the submission.
    pub vehicle_type: VehicleType,
    /// Test type identifier of the entry being evaluated.
    pub test_type_id: String,
    /// Most recent valid expiry across the vehicle's qualifying history, or
    /// the no-history sentinel.
    pub most_recent_expiry: NaiveDate,
    /// Anchor date: registration date (PSV, HGV) or first-use date (TRL),
    /// present only when it is a valid date.
    pub regn_or_first_use_date: Option<NaiveDate>,
}

impl ExpiryContext {
    /// Build the context for `entry` of `payload`.
    pub fn new(payload: &TestResult, entry: &TestTypeEntry, most_recent_expiry: NaiveDate) -> Self {
        let anchor = match payload.vehicle_type {
            VehicleType::Trl => payload.first_use_date.as_deref(),
            _ => payload.regn_date.as_deref(),
        };
        let regn_or_first_use_date = if temporal::is_valid_date(anchor) {
            anchor.and_then(parse_date)
        } else {
            None
        };

        Self {
            vehicle_type: payload.vehicle_type,
            test_type_id: entry.test_type_id.clone(),
            most_recent_expiry,
            regn_or_first_use_date,
        }
    }

    /// Whether the vehicle has a qualifying expiry on record.
    pub fn has_history(&self) -> bool {
        self.most_recent_expiry != no_history_sentinel()
    }

    /// Whether a valid registration or first-use date is on the submission.
    pub fn has_regn_or_first_use_date(&self) -> bool {
        self.regn_or_first_use_date.is_some()
    }
}
