//! # Vehicle Identity Newtypes
//!
//! Newtype wrappers for the two identifiers a vehicle's test history can be
//! keyed on. A system number is the record key assigned by the technical
//! records service; a VIN is the manufacturer's identifier. Keeping them as
//! distinct types prevents a VIN being queried against the system-number
//! index or the reverse.

use serde::{Deserialize, Serialize};

use crate::error::CvsError;

/// Technical-records system number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemNumber(String);

/// Vehicle identification number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vin(String);

impl SystemNumber {
    /// Validate and wrap a system number. Surrounding whitespace is trimmed.
    pub fn new(value: &str) -> Result<Self, CvsError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CvsError::Validation(
                "system number must not be empty".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Vin {
    /// Validate and wrap a VIN. VINs are stored upper-case.
    pub fn new(value: &str) -> Result<Self, CvsError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CvsError::Validation("VIN must not be empty".to_string()));
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CvsError::Validation(format!(
                "VIN must be alphanumeric, got {value:?}"
            )));
        }
        Ok(Self(value.to_ascii_uppercase()))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The identifier a history read is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum VehicleKey {
    /// Keyed on the technical-records system number.
    SystemNumber(SystemNumber),
    /// Keyed on the VIN.
    Vin(Vin),
}

impl VehicleKey {
    /// Build a key from the identifiers on a submission, preferring the
    /// system number and falling back to the VIN.
    ///
    /// # Errors
    ///
    /// Returns [`CvsError::Validation`] when neither identifier is usable.
    pub fn resolve(system_number: Option<&str>, vin: Option<&str>) -> Result<Self, CvsError> {
        if let Some(sn) = system_number.and_then(|s| SystemNumber::new(s).ok()) {
            return Ok(Self::SystemNumber(sn));
        }
        match vin {
            Some(v) => Vin::new(v).map(Self::Vin),
            None => Err(CvsError::Validation(
                "submission carries neither a system number nor a VIN".to_string(),
            )),
        }
    }

    /// The raw identifier value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SystemNumber(sn) => sn.as_str(),
            Self::Vin(vin) => vin.as_str(),
        }
    }
}

impl std::fmt::Display for SystemNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "system-number:{}", self.0)
    }
}

impl std::fmt::Display for Vin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vin:{}", self.0)
    }
}

impl std::fmt::Display for VehicleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SystemNumber(sn) => write!(f, "{sn}"),
            Self::Vin(vin) => write!(f, "{vin}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_system_number() {
        let key = VehicleKey::resolve(Some("10000001"), Some("1B7GG36N12S678410")).unwrap();
        assert_eq!(key, VehicleKey::SystemNumber(SystemNumber::new("10000001").unwrap()));
        assert_eq!(key.to_string(), "system-number:10000001");
    }

    #[test]
    fn test_resolve_falls_back_to_vin() {
        let key = VehicleKey::resolve(Some("  "), Some("1b7gg36n12s678410")).unwrap();
        assert_eq!(key.as_str(), "1B7GG36N12S678410");
        assert_eq!(key.to_string(), "vin:1B7GG36N12S678410");
    }

    #[test]
    fn test_resolve_requires_an_identifier() {
        assert!(VehicleKey::resolve(None, None).is_err());
        assert!(VehicleKey::resolve(Some(""), Some("")).is_err());
    }

    #[test]
    fn test_vin_rejects_punctuation() {
        assert!(Vin::new("ABC-123").is_err());
    }

    #[test]
    fn test_key_serde_tagged() {
        let key = VehicleKey::resolve(Some("42"), None).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"kind":"system_number","value":"42"}"#);
    }
}
