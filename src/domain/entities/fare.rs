//! # Fare Fan-out Entities
//!
//! The fixed delivery-area catalog and the per-area results of a fare
//! fan-out.

use crate::domain::value_objects::GeoPoint;
use serde::{Deserialize, Serialize};

/// A delivery area priced during a fare fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareArea {
    /// Canonical area name.
    pub area: String,
    /// Block identifier within the area.
    pub block: String,
    /// Delivery coordinates for the area.
    pub location: GeoPoint,
}

impl FareArea {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(area: impl Into<String>, block: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            area: area.into(),
            block: block.into(),
            location,
        }
    }
}

/// Result of pricing one area.
///
/// `None` measures mean the request for this area failed; the fan-out as a
/// whole still succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareEstimateResult {
    /// Canonical area name.
    pub area: String,
    /// Block identifier.
    pub block: String,
    /// Estimated fare.
    pub estimated_fare: Option<f64>,
    /// Route distance in meters.
    pub distance_meters: Option<f64>,
}

impl FareEstimateResult {
    /// Creates a successful result.
    #[must_use]
    pub fn priced(area: &FareArea, estimated_fare: f64, distance_meters: f64) -> Self {
        Self {
            area: area.area.clone(),
            block: area.block.clone(),
            estimated_fare: Some(estimated_fare),
            distance_meters: Some(distance_meters),
        }
    }

    /// Creates a null-valued result for a failed area.
    #[must_use]
    pub fn failed(area: &FareArea) -> Self {
        Self {
            area: area.area.clone(),
            block: area.block.clone(),
            estimated_fare: None,
            distance_meters: None,
        }
    }

    /// Returns true if the request for this area failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.estimated_fare.is_none() && self.distance_meters.is_none()
    }
}
