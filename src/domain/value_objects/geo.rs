//! # Geographic Values
//!
//! WGS84 coordinates and the inclusive date range used to query the
//! transaction source.

use crate::domain::errors::{DomainError, DomainResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees.
///
/// # Invariants
///
/// - `lat` in `[-90, 90]`, `lng` in `[-180, 180]`, both finite
///
/// # Examples
///
/// ```
/// use delivery_reports::domain::value_objects::GeoPoint;
///
/// let salmiya = GeoPoint::new(29.3339, 48.0753).unwrap();
/// assert_eq!(salmiya.lat(), 29.3339);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` when either component is
    /// out of range or not finite.
    pub fn new(lat: f64, lng: f64) -> DomainResult<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        if valid {
            Ok(Self { lat, lng })
        } else {
            Err(DomainError::invalid_coordinates(lat, lng))
        }
    }

    /// Latitude in degrees.
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[inline]
    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = DomainError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Wire format for dates.
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::invalid_date_range(start, end));
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range, inclusive.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start formatted for the wire.
    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.format(Self::FORMAT).to_string()
    }

    /// End formatted for the wire.
    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.format(Self::FORMAT).to_string()
    }
}
