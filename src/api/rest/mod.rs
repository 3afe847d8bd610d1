//! # REST API
//!
//! JSON endpoints that submit report jobs and expose their status.
//!
//! # Endpoints
//!
//! ## Jobs
//! - `POST /api/v1/reports` - Queue an aggregation report
//! - `POST /api/v1/fare-estimates` - Queue a fare fan-out sheet
//! - `GET /api/v1/jobs/{job_id}` - Job status
//!
//! ## Health
//! - `GET /api/v1/health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use delivery_reports::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let router = create_router(Arc::new(AppState::new(dispatcher)));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    AppState, CreateFareEstimateRequest, CreateReportRequest, ErrorResponse, HealthResponse,
    JobResponse,
};
pub use routes::create_router;
