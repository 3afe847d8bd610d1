//! # Fare Estimator
//!
//! Port and HTTP adapter for the external fare-estimate service, plus the
//! catalog of areas a fan-out prices.
//!
//! - [`FareEstimator`]: prices one pickup → dropoff leg
//! - [`HttpFareEstimator`]: `POST` adapter with static API-key credentials

pub mod area_catalog;
pub mod http_estimator;
pub mod traits;

pub use area_catalog::{builtin_areas, load_areas};
pub use http_estimator::HttpFareEstimator;
pub use traits::{FareEstimator, FareQuote, FareRequest};
