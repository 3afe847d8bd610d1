//! # Domain Errors
//!
//! Error types for domain validation failures.
//!
//! These errors describe input that cannot be turned into a valid domain
//! value: malformed amounts, timestamps outside the fixed order format,
//! coordinates outside the WGS84 range, and inverted date ranges.
//!
//! # Examples
//!
//! ```
//! use delivery_reports::domain::errors::DomainError;
//!
//! let err = DomainError::invalid_amount("abc");
//! assert!(err.to_string().contains("abc"));
//! ```

use thiserror::Error;

/// Domain validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Amount could not be parsed as a decimal number.
    #[error("invalid amount: '{0}'")]
    InvalidAmount(String),

    /// Timestamp did not match the expected format.
    #[error("invalid timestamp '{value}': expected format {expected}")]
    InvalidTimestamp {
        /// The raw value.
        value: String,
        /// The expected format string.
        expected: &'static str,
    },

    /// Latitude or longitude outside the valid range.
    #[error("invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },

    /// Start date is after end date.
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Range start.
        start: String,
        /// Range end.
        end: String,
    },
}

impl DomainError {
    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(value: impl Into<String>) -> Self {
        Self::InvalidAmount(value.into())
    }

    /// Creates an invalid timestamp error.
    #[must_use]
    pub fn invalid_timestamp(value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            expected,
        }
    }

    /// Creates an invalid coordinates error.
    #[must_use]
    pub fn invalid_coordinates(lat: f64, lng: f64) -> Self {
        Self::InvalidCoordinates { lat, lng }
    }

    /// Creates an invalid date range error.
    #[must_use]
    pub fn invalid_date_range(start: impl ToString, end: impl ToString) -> Self {
        Self::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_timestamp_mentions_format() {
        let err = DomainError::invalid_timestamp("yesterday", "%Y-%m-%d %H:%M:%S");
        let msg = err.to_string();
        assert!(msg.contains("yesterday"));
        assert!(msg.contains("%Y-%m-%d"));
    }

    #[test]
    fn invalid_date_range_display() {
        let err = DomainError::invalid_date_range("2025-02-01", "2025-01-01");
        assert_eq!(
            err.to_string(),
            "invalid date range: 2025-02-01 is after 2025-01-01"
        );
    }

    #[test]
    fn invalid_coordinates_compare_by_value() {
        let err = DomainError::invalid_coordinates(91.0, 48.0);
        assert_eq!(err, DomainError::invalid_coordinates(91.0, 48.0));
        assert_ne!(err, DomainError::invalid_coordinates(-91.0, 48.0));
        assert_eq!(err.to_string(), "invalid coordinates: lat=91, lng=48");
    }
}
