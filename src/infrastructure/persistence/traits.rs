//! # Repository Traits
//!
//! Port for the job-status store.
//!
//! Jobs are written by the dispatcher after every stage transition and read
//! by the status endpoint. Implementations must tolerate concurrent writers
//! for different jobs.

use crate::domain::entities::JobRecord;
use crate::domain::value_objects::JobId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for background job records.
#[async_trait]
pub trait JobRepository: Send + Sync + fmt::Debug {
    /// Records a newly submitted job.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if a job with the same id exists.
    async fn insert(&self, job: &JobRecord) -> RepositoryResult<()>;

    /// Replaces the stored state of an existing job.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the job was never inserted.
    async fn update(&self, job: &JobRecord) -> RepositoryResult<()>;

    /// Gets a job by ID.
    ///
    /// Returns `None` if the job does not exist.
    async fn get(&self, id: &JobId) -> RepositoryResult<Option<JobRecord>>;

    /// Counts all jobs.
    async fn count(&self) -> RepositoryResult<u64>;
}
