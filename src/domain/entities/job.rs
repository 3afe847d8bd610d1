//! # Job Record
//!
//! Observable state of a background report job.
//!
//! Every submission creates a [`JobRecord`] in [`JobStatus::Queued`]. The
//! dispatcher advances it through the pipeline stages and finishes it as
//! either [`JobStatus::Completed`] or [`JobStatus::Failed`], recording the
//! stage at which the failure happened.
//!
//! ```text
//! Queued → Fetching → Aggregating → Rendering → Notifying → Completed
//!    └──────────┴───────────┴────────────┴───────────┴──→ Failed
//! ```

use crate::domain::entities::report::ArtifactKind;
use crate::domain::value_objects::{JobId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Accepted, waiting for a worker slot.
    Queued,
    /// Fetching transactions.
    Fetching,
    /// Aggregating records or fanning out fare requests.
    Aggregating,
    /// Rendering and persisting the artifact.
    Rendering,
    /// Handing the artifact to the notifier.
    Notifying,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl JobStatus {
    /// Returns true for `Completed` and `Failed`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "QUEUED",
            Self::Fetching => "FETCHING",
            Self::Aggregating => "AGGREGATING",
            Self::Rendering => "RENDERING",
            Self::Notifying => "NOTIFYING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Why and where a job failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    /// Stage the job was in when it failed.
    pub stage: JobStatus,
    /// Error message.
    pub reason: String,
}

/// State of one background job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    job_id: JobId,
    kind: ArtifactKind,
    client_name: String,
    status: JobStatus,
    submitted_at: Timestamp,
    updated_at: Timestamp,
    artifact_file: Option<String>,
    failure: Option<JobFailure>,
}

impl JobRecord {
    /// Creates a queued job.
    #[must_use]
    pub fn queued(job_id: JobId, kind: ArtifactKind, client_name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            job_id,
            kind,
            client_name: client_name.into(),
            status: JobStatus::Queued,
            submitted_at: now,
            updated_at: now,
            artifact_file: None,
            failure: None,
        }
    }

    /// Job identifier.
    #[inline]
    #[must_use]
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// What the job produces.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Client the job runs for.
    #[inline]
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Submission time.
    #[inline]
    #[must_use]
    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }

    /// Last transition time.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// File name of the persisted artifact, once rendered.
    #[must_use]
    pub fn artifact_file(&self) -> Option<&str> {
        self.artifact_file.as_deref()
    }

    /// Failure details, if the job failed.
    #[must_use]
    pub fn failure(&self) -> Option<&JobFailure> {
        self.failure.as_ref()
    }

    /// Moves the job to a non-terminal stage.
    ///
    /// Terminal jobs are left untouched.
    pub fn advance(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        self.updated_at = Timestamp::now();
    }

    /// Records the persisted artifact file name.
    pub fn attach_artifact(&mut self, file_name: impl Into<String>) {
        self.artifact_file = Some(file_name.into());
        self.updated_at = Timestamp::now();
    }

    /// Marks the job completed.
    pub fn complete(&mut self) {
        self.advance(JobStatus::Completed);
    }

    /// Marks the job failed at its current stage.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.failure = Some(JobFailure {
            stage: self.status,
            reason: reason.into(),
        });
        self.status = JobStatus::Failed;
        self.updated_at = Timestamp::now();
    }
}
