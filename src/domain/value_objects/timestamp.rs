//! # Timestamp Value Objects
//!
//! Two notions of time live in this crate:
//!
//! - [`Timestamp`]: a UTC instant used for job bookkeeping.
//! - [`OrderTime`]: the timezone-naive local time at which a delivery order
//!   was created, as reported by the transaction source in the fixed
//!   `YYYY-MM-DD HH:MM:SS` format.
//!
//! # Examples
//!
//! ```
//! use delivery_reports::domain::value_objects::timestamp::{OrderTime, hour_bucket_label};
//!
//! let created = OrderTime::parse("2025-01-01 23:50:00").unwrap();
//! assert_eq!(created.hour(), 23);
//! assert_eq!(hour_bucket_label(created.hour()), "23:00-00:00");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns true if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns the duration between this timestamp and another.
    ///
    /// Returns zero if `other` is before `self`.
    #[must_use]
    pub fn duration_until(&self, other: &Self) -> std::time::Duration {
        let diff = other.0 - self.0;
        diff.to_std().unwrap_or(std::time::Duration::ZERO)
    }

    /// Formats the timestamp as ISO 8601.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

/// Local, timezone-naive creation time of a delivery order.
///
/// # Invariants
///
/// - Only values in the exact `YYYY-MM-DD HH:MM:SS` format are accepted
/// - No timezone conversion is applied; the hour is taken as written
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderTime(NaiveDateTime);

impl OrderTime {
    /// Order timestamp format used by the transaction source.
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Parses an order timestamp.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimestamp` if the value does not match
    /// [`OrderTime::FORMAT`].
    pub fn parse(value: &str) -> DomainResult<Self> {
        NaiveDateTime::parse_from_str(value.trim(), Self::FORMAT)
            .map(Self)
            .map_err(|_| DomainError::invalid_timestamp(value, Self::FORMAT))
    }

    /// Returns the hour of day, `0..=23`.
    #[inline]
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the underlying naive datetime.
    #[inline]
    #[must_use]
    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl fmt::Display for OrderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

/// Returns the column label for an hour-of-day bucket.
///
/// Hour 23 wraps to midnight: `23:00-00:00`.
#[must_use]
pub fn hour_bucket_label(hour: u32) -> String {
    let hour = hour % 24;
    format!("{:02}:00-{:02}:00", hour, (hour + 1) % 24)
}

/// Returns the 24 hour-of-day bucket labels in order.
#[must_use]
pub fn hour_bucket_labels() -> Vec<String> {
    (0..HOURS_PER_DAY as u32).map(hour_bucket_label).collect()
}
