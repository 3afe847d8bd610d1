//! # Application Layer
//!
//! Use cases of the report service: validating submissions, running report
//! jobs and exposing their status.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, InfrastructureError};
