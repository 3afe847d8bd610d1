//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! - [`ReportKind`] - Which aggregation a report job runs
//! - [`ArtifactNaming`] - How rendered artifacts are named on disk
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Report kind selecting exactly one aggregation strategy.
///
/// The set is closed: adding a kind forces every `match` on it to be
/// revisited.
///
/// # Examples
///
/// ```
/// use delivery_reports::domain::value_objects::enums::ReportKind;
///
/// let kind: ReportKind = "hourly_orders".parse().unwrap();
/// assert_eq!(kind, ReportKind::HourlyOrders);
/// assert_eq!(kind.file_suffix(), "hourly_orders");
/// assert!("fly_me_to_the_moon".parse::<ReportKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Order counts per user per hour of day.
    HourlyOrders,
    /// Mean absolute fare per user.
    AverageFare,
    /// Summed absolute fare per user.
    TotalFare,
    /// Number of orders per user.
    NumberOfOrders,
    /// Order counts per user per fare bucket.
    AmountRanges,
    /// Pickup counts per canonical area per hour of day.
    PickupCountsPerArea,
}

impl ReportKind {
    /// Every report kind, in selector order.
    pub const ALL: [ReportKind; 6] = [
        Self::HourlyOrders,
        Self::AverageFare,
        Self::TotalFare,
        Self::NumberOfOrders,
        Self::AmountRanges,
        Self::PickupCountsPerArea,
    ];

    /// Returns the wire selector for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HourlyOrders => "hourly_orders",
            Self::AverageFare => "average_fare",
            Self::TotalFare => "total_fare",
            Self::NumberOfOrders => "number_of_orders",
            Self::AmountRanges => "amount_ranges",
            Self::PickupCountsPerArea => "pickup_counts_per_area",
        }
    }

    /// Returns the suffix appended to the client name in artifact file names.
    #[inline]
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        self.as_str()
    }

    /// Returns a human readable title used for sheet names and email subjects.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::HourlyOrders => "Hourly Orders",
            Self::AverageFare => "Average Fare",
            Self::TotalFare => "Total Fare",
            Self::NumberOfOrders => "Number of Orders",
            Self::AmountRanges => "Amount Ranges",
            Self::PickupCountsPerArea => "Pickup Counts Per Area",
        }
    }

    /// Returns true if this kind buckets records by pickup area.
    #[inline]
    #[must_use]
    pub const fn uses_pickup_areas(self) -> bool {
        matches!(self, Self::PickupCountsPerArea)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "hourly_orders" => Ok(Self::HourlyOrders),
            "average_fare" => Ok(Self::AverageFare),
            "total_fare" => Ok(Self::TotalFare),
            "number_of_orders" => Ok(Self::NumberOfOrders),
            "amount_ranges" => Ok(Self::AmountRanges),
            "pickup_counts_per_area" => Ok(Self::PickupCountsPerArea),
            _ => Err(ParseEnumError::InvalidValue("ReportKind", s.to_string())),
        }
    }
}

/// Naming policy for rendered artifacts.
///
/// `PerJob` embeds the job id so concurrent jobs for the same client and
/// report kind write distinct files. `Legacy` reproduces the historical
/// `<client>_<suffix>.xlsx` name, which is overwritten on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactNaming {
    /// `<client>_<suffix>_<job_id>.xlsx`
    #[default]
    PerJob,
    /// `<client>_<suffix>.xlsx`
    Legacy,
}

impl fmt::Display for ArtifactNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerJob => write!(f, "per_job"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for ArtifactNaming {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_job" | "perjob" => Ok(Self::PerJob),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ParseEnumError::InvalidValue("ArtifactNaming", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod report_kind {
        use super::*;

        #[test]
        fn from_str_accepts_every_selector() {
            for kind in ReportKind::ALL {
                assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
            }
        }

        #[test]
        fn from_str_normalizes_case_and_separators() {
            assert_eq!(
                "Hourly-Orders".parse::<ReportKind>().unwrap(),
                ReportKind::HourlyOrders
            );
            assert_eq!(
                " pickup counts per area ".parse::<ReportKind>().unwrap(),
                ReportKind::PickupCountsPerArea
            );
        }

        #[test]
        fn from_str_rejects_unknown() {
            let err = "weekly_digest".parse::<ReportKind>().unwrap_err();
            assert_eq!(
                err,
                ParseEnumError::InvalidValue("ReportKind", "weekly_digest".to_string())
            );
        }

        #[test]
        fn only_pickup_report_uses_areas() {
            let with_areas: Vec<_> = ReportKind::ALL
                .into_iter()
                .filter(|k| k.uses_pickup_areas())
                .collect();
            assert_eq!(with_areas, vec![ReportKind::PickupCountsPerArea]);
        }

        #[test]
        fn serde_roundtrip() {
            let json = serde_json::to_string(&ReportKind::AmountRanges).unwrap();
            assert_eq!(json, "\"amount_ranges\"");
            let back: ReportKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, ReportKind::AmountRanges);
        }
    }

    mod artifact_naming {
        use super::*;

        #[test]
        fn default_is_per_job() {
            assert_eq!(ArtifactNaming::default(), ArtifactNaming::PerJob);
        }

        #[test]
        fn from_str() {
            assert_eq!(
                "legacy".parse::<ArtifactNaming>().unwrap(),
                ArtifactNaming::Legacy
            );
            assert_eq!(
                "per-job".parse::<ArtifactNaming>().unwrap(),
                ArtifactNaming::PerJob
            );
            assert!("random".parse::<ArtifactNaming>().is_err());
        }
    }

    #[test]
    fn parse_enum_error_display() {
        let err = ParseEnumError::InvalidValue("ReportKind", "nope".to_string());
        assert_eq!(err.to_string(), "invalid ReportKind value: 'nope'");
    }
}
