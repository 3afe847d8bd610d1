//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`ReportStrategy`]: one aggregation per report kind
//! - [`FareFanoutClient`]: per-area fare pricing
//! - [`ReportDispatcher`]: background job pipeline

pub mod dispatch;
pub mod fare_fanout;
pub mod report_strategy;

pub use dispatch::{
    DispatchSettings, FareEstimateRequest, JobAcknowledgement, PipelinePorts, ReportDispatcher,
    ReportRequest,
};
pub use fare_fanout::{FareFanoutClient, FareFanoutConfig, fare_estimates_table};
pub use report_strategy::{ReportStrategy, strategy_for};
