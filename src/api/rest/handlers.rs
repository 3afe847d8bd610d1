//! # REST Handlers
//!
//! Request/response types and handlers. Handlers only translate between
//! JSON and the dispatcher; all validation lives in the application layer.

use crate::application::error::ApplicationError;
use crate::application::services::{
    FareEstimateRequest, JobAcknowledgement, ReportDispatcher, ReportRequest,
};
use crate::domain::entities::{JobFailure, JobRecord, JobStatus};
use crate::domain::value_objects::JobId;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Job dispatcher.
    pub dispatcher: ReportDispatcher,
}

impl AppState {
    /// Creates handler state around `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: ReportDispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Body of `POST /api/v1/reports`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportRequest {
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`, inclusive.
    pub end_date: String,
    /// Filter key forwarded to the transaction service.
    pub filter_by: String,
    /// Client the report is generated for.
    #[serde(rename = "clientName")]
    pub client_name: String,
    /// Report selector.
    pub task_function: String,
}

impl From<CreateReportRequest> for ReportRequest {
    fn from(req: CreateReportRequest) -> Self {
        Self {
            task_function: req.task_function,
            filter_by: req.filter_by,
            start_date: req.start_date,
            end_date: req.end_date,
            client_name: req.client_name,
        }
    }
}

/// Body of `POST /api/v1/fare-estimates`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFareEstimateRequest {
    /// Pickup latitude.
    pub pickup_lat: f64,
    /// Pickup longitude.
    pub pickup_lng: f64,
    /// Pricing template identifier.
    pub template: String,
    /// Client the sheet is generated for.
    #[serde(rename = "clientName")]
    pub client_name: String,
}

impl From<CreateFareEstimateRequest> for FareEstimateRequest {
    fn from(req: CreateFareEstimateRequest) -> Self {
        Self {
            pickup_lat: req.pickup_lat,
            pickup_lng: req.pickup_lng,
            template: req.template,
            client_name: req.client_name,
        }
    }
}

/// Job status as returned by `GET /api/v1/jobs/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    /// Job identifier.
    pub job_id: JobId,
    /// Artifact kind, e.g. `hourly_orders` or `fare_estimates`.
    pub kind: String,
    /// Client name.
    pub client_name: String,
    /// Pipeline stage.
    pub status: JobStatus,
    /// Submission time, RFC 3339.
    pub submitted_at: String,
    /// Last transition time, RFC 3339.
    pub updated_at: String,
    /// Persisted artifact file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_file: Option<String>,
    /// Failure stage and reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobFailure>,
}

impl From<JobRecord> for JobResponse {
    fn from(job: JobRecord) -> Self {
        Self {
            job_id: job.job_id(),
            kind: job.kind().file_suffix().to_string(),
            client_name: job.client_name().to_string(),
            status: job.status(),
            submitted_at: job.submitted_at().to_iso8601(),
            updated_at: job.updated_at().to_iso8601(),
            artifact_file: job.artifact_file().map(str::to_string),
            error: job.failure().cloned(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine readable error kind.
    pub error: String,
    /// Details.
    pub message: String,
}

impl ErrorResponse {
    /// Creates an error body.
    #[must_use]
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// HTTP mapping of an application error.
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, kind) = if err.is_unknown_report_kind() {
            (StatusCode::BAD_REQUEST, "wrong function")
        } else if err.is_validation() {
            (StatusCode::BAD_REQUEST, "validation_error")
        } else if err.is_not_found() {
            (StatusCode::NOT_FOUND, "not_found")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        };

        if status.is_server_error() {
            error!(error = %err, "request failed");
        } else {
            warn!(error = %err, "request rejected");
        }
        (status, Json(ErrorResponse::new(kind, err.to_string()))).into_response()
    }
}

/// `POST /api/v1/reports`
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<JobAcknowledgement>), ApiError> {
    let ack = state.dispatcher.submit_report(req.into()).await?;
    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// `POST /api/v1/fare-estimates`
pub async fn create_fare_estimate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFareEstimateRequest>,
) -> Result<(StatusCode, Json<JobAcknowledgement>), ApiError> {
    let ack = state.dispatcher.submit_fare_estimate(req.into()).await?;
    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// `GET /api/v1/jobs/{job_id}`
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let job_id: JobId = job_id
        .parse()
        .map_err(|_| ApplicationError::validation(format!("invalid job id: {}", job_id)))?;
    let job = state.dispatcher.job(&job_id).await?;
    Ok(Json(job.into()))
}

/// `GET /api/v1/health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
