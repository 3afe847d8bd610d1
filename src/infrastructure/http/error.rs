//! # Upstream Errors
//!
//! Error types for calls to remote services (the transaction source and
//! the fare estimator).
//!
//! # Examples
//!
//! ```
//! use delivery_reports::infrastructure::http::error::UpstreamError;
//!
//! let error = UpstreamError::timeout("Request timed out after 5000ms");
//! assert!(error.is_transient());
//!
//! let error = UpstreamError::authentication("Invalid API key");
//! assert!(!error.is_transient());
//! ```

use thiserror::Error;

/// Error type for remote service calls.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Request timed out.
    #[error("upstream timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("upstream connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Credentials rejected.
    #[error("upstream authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("upstream rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// Request rejected as invalid.
    #[error("upstream invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Server returned a 5xx status.
    #[error("upstream server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body or message.
        message: String,
    },

    /// Unexpected status or a body that could not be decoded.
    #[error("upstream protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Local failure building or sending the request.
    #[error("upstream internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl UpstreamError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the failure is likely transient.
    ///
    /// Nothing in the pipeline retries; this only classifies log output.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Connection { .. }
                | Self::RateLimited { .. }
                | Self::Server { .. }
        )
    }

    /// Returns the HTTP status, if the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for upstream calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
