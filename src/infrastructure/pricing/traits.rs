//! # Fare Estimator Port

use crate::domain::value_objects::GeoPoint;
use crate::infrastructure::http::UpstreamResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One pricing request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareRequest {
    /// Pickup coordinates.
    pub pickup: GeoPoint,
    /// Delivery coordinates.
    pub dropoff: GeoPoint,
    /// Pricing template identifier.
    pub template_id: String,
}

/// Successful pricing response.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FareQuote {
    /// Estimated fare.
    pub estimated_fare: f64,
    /// Route distance in meters.
    #[serde(alias = "distance_meters")]
    pub distance: f64,
}

/// External fare-estimate service.
#[async_trait]
pub trait FareEstimator: Send + Sync + fmt::Debug {
    /// Prices a single leg.
    ///
    /// # Errors
    ///
    /// Returns an upstream error for non-success statuses, transport
    /// failures and malformed bodies.
    async fn estimate(&self, request: &FareRequest) -> UpstreamResult<FareQuote>;
}
