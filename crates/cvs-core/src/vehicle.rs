//! # Vehicle Type — Single Source of Truth
//!
//! Defines the `VehicleType` enum covering every vehicle type a test
//! submission may carry. Every `match` on `VehicleType` must be exhaustive,
//! so introducing a new vehicle type forces each consumer to decide how it
//! is treated, in particular whether it takes part in expiry calculation.
//!
//! Only commercial vehicles (PSV, HGV, TRL) are issued annual test expiry
//! dates by the expiry engine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CvsError;

/// Vehicle types recognised on a test submission.
///
/// | Type | Description |
/// |------|-------------|
/// | PSV | Public service vehicle (bus, coach) |
/// | HGV | Heavy goods vehicle |
/// | TRL | Trailer |
/// | LGV | Light goods vehicle |
/// | Car | Car |
/// | Motorcycle | Motorcycle |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    /// Public service vehicle.
    Psv,
    /// Heavy goods vehicle.
    Hgv,
    /// Trailer.
    Trl,
    /// Light goods vehicle.
    Lgv,
    /// Car.
    Car,
    /// Motorcycle.
    Motorcycle,
}

impl VehicleType {
    /// Returns all vehicle types in canonical order.
    pub fn all() -> &'static [VehicleType] {
        &[
            Self::Psv,
            Self::Hgv,
            Self::Trl,
            Self::Lgv,
            Self::Car,
            Self::Motorcycle,
        ]
    }

    /// Returns the lower-case wire identifier for this vehicle type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Psv => "psv",
            Self::Hgv => "hgv",
            Self::Trl => "trl",
            Self::Lgv => "lgv",
            Self::Car => "car",
            Self::Motorcycle => "motorcycle",
        }
    }

    /// Whether submissions for this vehicle type are issued expiry dates.
    pub fn is_expiry_eligible(&self) -> bool {
        match self {
            Self::Psv | Self::Hgv | Self::Trl => true,
            Self::Lgv | Self::Car | Self::Motorcycle => false,
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = CvsError;

    /// Parse a vehicle type from its lower-case wire identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "psv" => Ok(Self::Psv),
            "hgv" => Ok(Self::Hgv),
            "trl" => Ok(Self::Trl),
            "lgv" => Ok(Self::Lgv),
            "car" => Ok(Self::Car),
            "motorcycle" => Ok(Self::Motorcycle),
            other => Err(CvsError::Validation(format!(
                "unknown vehicle type: {other:?}"
            ))),
        }
    }
}
