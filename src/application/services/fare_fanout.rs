//! # Fare Fan-out
//!
//! Prices one pickup point against every area of a fixed catalog.
//!
//! Requests are issued one at a time in catalog order, optionally spaced by
//! a rate limiter. Each request is bounded by its own timeout. A failed,
//! rejected or timed-out area yields a null-valued row and the fan-out moves
//! on; there is no retry. N areas always produce N results.

use crate::domain::entities::{
    CellValue, FareArea, FareEstimateResult, ReportColumn, ReportTable,
};
use crate::domain::value_objects::GeoPoint;
use crate::infrastructure::pricing::{FareEstimator, FareRequest};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Configuration for a fare fan-out.
#[derive(Debug, Clone)]
pub struct FareFanoutConfig {
    /// Timeout for each area's request in milliseconds.
    pub per_area_timeout_ms: u64,
    /// Maximum request rate; unlimited when `None`.
    pub requests_per_second: Option<NonZeroU32>,
}

impl Default for FareFanoutConfig {
    fn default() -> Self {
        Self {
            per_area_timeout_ms: 5000,
            requests_per_second: None,
        }
    }
}

impl FareFanoutConfig {
    /// Sets the per-area timeout.
    #[must_use]
    pub fn with_per_area_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_area_timeout_ms = timeout_ms;
        self
    }

    /// Sets the request rate limit. Zero disables limiting.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.requests_per_second = NonZeroU32::new(requests_per_second);
        self
    }
}

/// Fans a pickup point out over the area catalog.
#[derive(Clone)]
pub struct FareFanoutClient {
    estimator: Arc<dyn FareEstimator>,
    areas: Arc<Vec<FareArea>>,
    config: FareFanoutConfig,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl fmt::Debug for FareFanoutClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FareFanoutClient")
            .field("estimator", &self.estimator)
            .field("areas", &self.areas.len())
            .field("config", &self.config)
            .field("rate_limited", &self.limiter.is_some())
            .finish()
    }
}

impl FareFanoutClient {
    /// Creates a client pricing `areas` through `estimator`.
    #[must_use]
    pub fn new(
        estimator: Arc<dyn FareEstimator>,
        areas: Vec<FareArea>,
        config: FareFanoutConfig,
    ) -> Self {
        // Burst of one spaces requests evenly instead of front-loading them.
        let limiter = config.requests_per_second.map(|rps| {
            Arc::new(RateLimiter::direct(
                Quota::per_second(rps).allow_burst(NonZeroU32::MIN),
            ))
        });
        Self {
            estimator,
            areas: Arc::new(areas),
            config,
            limiter,
        }
    }

    /// Areas priced by this client, in order.
    #[must_use]
    pub fn areas(&self) -> &[FareArea] {
        &self.areas
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FareFanoutConfig {
        &self.config
    }

    /// Prices `pickup` against every area using `template_id`.
    ///
    /// Never fails: per-area errors become rows with null measures.
    pub async fn estimate(&self, pickup: GeoPoint, template_id: &str) -> Vec<FareEstimateResult> {
        let per_area_timeout = Duration::from_millis(self.config.per_area_timeout_ms);
        let mut results = Vec::with_capacity(self.areas.len());

        for area in self.areas.iter() {
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let request = FareRequest {
                pickup,
                dropoff: area.location,
                template_id: template_id.to_string(),
            };

            let result = match timeout(per_area_timeout, self.estimator.estimate(&request)).await {
                Ok(Ok(quote)) => {
                    debug!(area = %area.area, fare = quote.estimated_fare, "area priced");
                    FareEstimateResult::priced(area, quote.estimated_fare, quote.distance)
                }
                Ok(Err(e)) => {
                    warn!(area = %area.area, error = %e, "fare estimate failed");
                    FareEstimateResult::failed(area)
                }
                Err(_) => {
                    warn!(area = %area.area, timeout_ms = self.config.per_area_timeout_ms, "fare estimate timed out");
                    FareEstimateResult::failed(area)
                }
            };
            results.push(result);
        }

        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!(areas = results.len(), failed, "fare fan-out finished");
        results
    }
}

/// Lays fan-out results out as a report table.
#[must_use]
pub fn fare_estimates_table(results: &[FareEstimateResult]) -> ReportTable {
    let mut table = ReportTable::new(
        "Fare Estimates",
        vec![
            ReportColumn::new("Area", 25.0),
            ReportColumn::new("Block", 10.0),
            ReportColumn::new("Estimated Fare", 15.0),
            ReportColumn::new("Distance (m)", 15.0),
        ],
    );
    for result in results {
        table.push_row(vec![
            CellValue::text(result.area.clone()),
            CellValue::text(result.block.clone()),
            CellValue::optional_number(result.estimated_fare),
            CellValue::optional_number(result.distance_meters),
        ]);
    }
    table
}
