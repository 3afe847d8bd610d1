//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity
//!
//! - [`JobId`]: UUID-based job identifier
//!
//! ## Measures
//!
//! - [`Amount`]: decimal fare amount parsed from loose JSON
//! - [`AmountRange`]: fixed fare buckets
//!
//! ## Time and place
//!
//! - [`OrderTime`]: naive local order creation time
//! - [`Timestamp`]: UTC instant for bookkeeping
//! - [`GeoPoint`], [`DateRange`]
//!
//! ## Domain Enums
//!
//! - [`ReportKind`]: which aggregation a job runs
//! - [`ArtifactNaming`]: how artifacts are named on disk

pub mod amount;
pub mod enums;
pub mod geo;
pub mod ids;
pub mod timestamp;

pub use amount::{Amount, AmountRange};
pub use enums::{ArtifactNaming, ParseEnumError, ReportKind};
pub use geo::{DateRange, GeoPoint};
pub use ids::JobId;
pub use timestamp::{OrderTime, Timestamp};
