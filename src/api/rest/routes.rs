//! # REST Routes

use crate::api::rest::handlers::{
    AppState, create_fare_estimate, create_report, get_job, health_check,
};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the service router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/reports", post(create_report))
        .route("/fare-estimates", post(create_fare_estimate))
        .route("/jobs/{job_id}", get(get_job))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
