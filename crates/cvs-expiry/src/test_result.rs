//! # Test Result Payload
//!
//! The submission shape the engine reads and writes, and the historical
//! record shape a history source returns. Field names follow the camelCase
//! wire format of the test-results API.
//!
//! Fields the engine does not interpret are kept in `extra` and written back
//! verbatim, so a payload survives a decode/compute/encode round trip with
//! only `testExpiryDate` changed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cvs_core::VehicleType;

use crate::codes::ANNUAL_WITH_CERTIFICATE;

/// Overall status of a test submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// The tester has submitted the result.
    Submitted,
    /// The test was cancelled before submission.
    Cancelled,
}

/// Outcome of a single test type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    /// Passed.
    Pass,
    /// Failed.
    Fail,
    /// Passed after rectification at station.
    Prs,
    /// Abandoned before completion.
    Abandoned,
}

impl TestOutcome {
    /// Whether the outcome results in a certificate.
    pub fn is_certifying(&self) -> bool {
        matches!(self, Self::Pass | Self::Prs)
    }
}

/// One test type carried out as part of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTypeEntry {
    /// Test type identifier (e.g. "94").
    pub test_type_id: String,
    /// Short test code (e.g. "aat").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
    /// Classification, e.g. "Annual With Certificate".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type_classification: Option<String>,
    /// Outcome of this test type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result: Option<TestOutcome>,
    /// Computed expiry date (ISO 8601, UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_expiry_date: Option<String>,
    /// Fields not interpreted by the engine.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestTypeEntry {
    /// Whether this entry is issued an expiry date: classified as annual
    /// with certificate and passed (or passed after rectification).
    pub fn is_expiry_eligible(&self) -> bool {
        self.test_type_classification.as_deref() == Some(ANNUAL_WITH_CERTIFICATE)
            && self.test_result.is_some_and(|r| r.is_certifying())
    }
}

/// A test result submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Identifier of this test result, when already assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result_id: Option<String>,
    /// Technical-records system number of the vehicle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_number: Option<String>,
    /// VIN of the vehicle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    /// Submission status.
    pub test_status: TestStatus,
    /// Vehicle type.
    pub vehicle_type: VehicleType,
    /// Registration date (PSV, HGV).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regn_date: Option<String>,
    /// Date of first use (TRL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_use_date: Option<String>,
    /// Test types carried out, in submission order.
    #[serde(default)]
    pub test_types: Vec<TestTypeEntry>,
    /// Fields not interpreted by the engine.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A test type from a previously submitted test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTestType {
    /// Test code, compared case-insensitively against the expiry allow-list.
    #[serde(default)]
    pub test_code: Option<String>,
    /// Expiry date issued at the time, if any.
    #[serde(default)]
    pub test_expiry_date: Option<String>,
}

/// A previously submitted test result for a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTestResult {
    /// Technical-records system number.
    #[serde(default)]
    pub system_number: Option<String>,
    /// VIN.
    #[serde(default)]
    pub vin: Option<String>,
    /// Submission status at the time of storage.
    pub test_status: TestStatus,
    /// When the test finished (ISO 8601).
    #[serde(default)]
    pub test_end_timestamp: Option<String>,
    /// Test types carried out.
    #[serde(default)]
    pub test_types: Vec<HistoricalTestType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(classification: &str, result: TestOutcome) -> TestTypeEntry {
        TestTypeEntry {
            test_type_id: "94".to_string(),
            test_code: Some("aat".to_string()),
            test_type_classification: Some(classification.to_string()),
            test_result: Some(result),
            test_expiry_date: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn eligibility_requires_certificate_and_pass() {
        assert!(entry(ANNUAL_WITH_CERTIFICATE, TestOutcome::Pass).is_expiry_eligible());
        assert!(entry(ANNUAL_WITH_CERTIFICATE, TestOutcome::Prs).is_expiry_eligible());
        assert!(!entry(ANNUAL_WITH_CERTIFICATE, TestOutcome::Fail).is_expiry_eligible());
        assert!(!entry(ANNUAL_WITH_CERTIFICATE, TestOutcome::Abandoned).is_expiry_eligible());
        assert!(!entry("NON ANNUAL", TestOutcome::Pass).is_expiry_eligible());
    }

    #[test]
    fn eligibility_requires_both_fields_present() {
        let mut e = entry(ANNUAL_WITH_CERTIFICATE, TestOutcome::Pass);
        e.test_result = None;
        assert!(!e.is_expiry_eligible());

        let mut e = entry(ANNUAL_WITH_CERTIFICATE, TestOutcome::Pass);
        e.test_type_classification = None;
        assert!(!e.is_expiry_eligible());
    }

    #[test]
    fn payload_preserves_unknown_fields() {
        let input = json!({
            "testResultId": "abc-123",
            "systemNumber": "10000001",
            "vin": "1B7GG36N12S678410",
            "testStatus": "submitted",
            "vehicleType": "psv",
            "testStationName": "Rowe, Wunsch and Wisoky",
            "testTypes": [{
                "testTypeId": "1",
                "testCode": "aas",
                "testTypeClassification": "Annual With Certificate",
                "testResult": "pass",
                "certificateNumber": "W01A00209",
                "defects": []
            }]
        });
        let payload: TestResult = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(payload.extra["testStationName"], "Rowe, Wunsch and Wisoky");
        assert_eq!(payload.test_types[0].extra["certificateNumber"], "W01A00209");

        let output = serde_json::to_value(&payload).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn payload_without_test_types_decodes_empty() {
        let payload: TestResult = serde_json::from_value(json!({
            "testStatus": "submitted",
            "vehicleType": "hgv"
        }))
        .unwrap();
        assert!(payload.test_types.is_empty());
    }

    #[test]
    fn unknown_outcome_is_rejected() {
        let result = serde_json::from_value::<TestTypeEntry>(json!({
            "testTypeId": "1",
            "testResult": "maybe"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn historical_result_ignores_unrelated_fields() {
        let record: HistoricalTestResult = serde_json::from_value(json!({
            "systemNumber": "10000001",
            "testStatus": "submitted",
            "testerName": "someone",
            "testTypes": [{ "testCode": "AAT", "testExpiryDate": "2020-04-01", "testResult": "pass" }]
        }))
        .unwrap();
        assert_eq!(record.test_types.len(), 1);
        assert_eq!(record.test_types[0].test_expiry_date.as_deref(), Some("2020-04-01"));
    }
}
