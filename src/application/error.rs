//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Submission errors are returned to the caller synchronously. Errors raised
//! inside a background job never reach the caller; the dispatcher records
//! them on the job instead.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── UnknownReportKind(String)   - Selector names no report ("wrong function")
//! ├── Validation(String)          - Input validation failures
//! ├── NotFound                    - Resource not found
//! ├── Domain(DomainError)         - Invalid dates, coordinates
//! ├── Fetch(UpstreamError)        - Transaction source failures
//! ├── Catalog(CatalogError)       - Geography or area catalog failures
//! ├── Render(RenderError)         - Workbook or storage failures
//! ├── Notification(NotificationError)
//! ├── Infrastructure(InfrastructureError)
//! └── Internal(String)
//! ```
//!
//! # Examples
//!
//! ```
//! use delivery_reports::application::error::ApplicationError;
//!
//! let err = ApplicationError::unknown_report_kind("fly_me_to_the_moon");
//! assert!(err.is_unknown_report_kind());
//! assert_eq!(err.to_string(), "wrong function: fly_me_to_the_moon");
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::geography::CatalogError;
use crate::infrastructure::http::UpstreamError;
use crate::infrastructure::notification::NotificationError;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::rendering::RenderError;
use thiserror::Error;

/// Infrastructure layer error.
///
/// Failures of the process-local machinery around jobs rather than of an
/// external collaborator.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Background task failed to run to completion.
    #[error("task error: {0}")]
    Task(String),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl InfrastructureError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a task error.
    #[must_use]
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task(message.into())
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The task selector names no known report.
    #[error("wrong function: {0}")]
    UnknownReportKind(String),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Domain error from value construction.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Transaction fetch failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] UpstreamError),

    /// A catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Rendering or persisting the artifact failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Delivering the artifact failed.
    #[error("notification error: {0}")]
    Notification(#[from] NotificationError),

    /// Infrastructure error.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates an unknown report kind error.
    #[must_use]
    pub fn unknown_report_kind(selector: impl Into<String>) -> Self {
        Self::UnknownReportKind(selector.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the selector named no report.
    #[must_use]
    pub fn is_unknown_report_kind(&self) -> bool {
        matches!(self, Self::UnknownReportKind(_))
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the caller sent bad input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Domain(_))
    }

    /// Returns true if retrying the job could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_transient(),
            Self::Notification(e) => e.is_transport(),
            _ => false,
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::Infrastructure(InfrastructureError::Repository(err))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
