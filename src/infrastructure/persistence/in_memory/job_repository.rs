//! # In-Memory Job Repository
//!
//! [`JobRepository`] keyed by job id in a [`DashMap`]. Job records only live
//! as long as the process.
//!
//! With a retention window, `Completed` and `Failed` jobs whose last
//! transition is older than the window are evicted whenever a new job is
//! inserted. Queued and running jobs are never evicted.

use crate::domain::entities::JobRecord;
use crate::domain::value_objects::{JobId, Timestamp};
use crate::infrastructure::persistence::traits::{
    JobRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::Duration;
use tracing::debug;

const ENTITY: &str = "Job";

/// In-memory job-status store.
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: DashMap<JobId, JobRecord>,
    retention: Option<Duration>,
}

impl InMemoryJobRepository {
    /// Creates a new empty repository that keeps every job.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository evicting finished jobs older than `retention`.
    #[must_use]
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            jobs: DashMap::new(),
            retention: Some(retention),
        }
    }

    /// Returns the retention window, if any.
    #[inline]
    #[must_use]
    pub fn retention(&self) -> Option<Duration> {
        self.retention
    }

    /// Evicts finished jobs last updated before `cutoff`.
    ///
    /// Returns the number of evicted jobs.
    pub fn prune_finished_before(&self, cutoff: Timestamp) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|_, job| {
            !(job.status().is_terminal() && job.updated_at().is_before(&cutoff))
        });
        before.saturating_sub(self.jobs.len())
    }

    fn prune_expired(&self) {
        let Some(retention) = self.retention else {
            return;
        };
        let Some(cutoff) = chrono::Duration::from_std(retention)
            .ok()
            .and_then(|window| Utc::now().checked_sub_signed(window))
        else {
            return;
        };
        let evicted = self.prune_finished_before(Timestamp::from(cutoff));
        if evicted > 0 {
            debug!(evicted, remaining = self.jobs.len(), "evicted finished jobs");
        }
    }

    /// Returns the number of stored jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if no job has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert(&self, job: &JobRecord) -> RepositoryResult<()> {
        self.prune_expired();
        match self.jobs.entry(job.job_id()) {
            Entry::Occupied(_) => Err(RepositoryError::duplicate(ENTITY, job.job_id().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(job.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, job: &JobRecord) -> RepositoryResult<()> {
        match self.jobs.get_mut(&job.job_id()) {
            Some(mut stored) => {
                *stored = job.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found(ENTITY, job.job_id().to_string())),
        }
    }

    async fn get(&self, id: &JobId) -> RepositoryResult<Option<JobRecord>> {
        Ok(self.jobs.get(id).map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        Ok(self.jobs.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{ArtifactKind, JobStatus};

    fn job() -> JobRecord {
        JobRecord::queued(JobId::new_v4(), ArtifactKind::FareEstimates, "acme")
    }

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryJobRepository::new();
        assert!(repo.is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryJobRepository::new();
        let job = job();
        repo.insert(&job).await.unwrap();

        let stored = repo.get(&job.job_id()).await.unwrap().unwrap();
        assert_eq!(stored, job);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn insert_twice_is_duplicate() {
        let repo = InMemoryJobRepository::new();
        let job = job();
        repo.insert(&job).await.unwrap();
        assert!(repo.insert(&job).await.unwrap_err().is_duplicate());
    }

    #[tokio::test]
    async fn update_replaces_state() {
        let repo = InMemoryJobRepository::new();
        let mut job = job();
        repo.insert(&job).await.unwrap();

        job.advance(JobStatus::Aggregating);
        repo.update(&job).await.unwrap();

        let stored = repo.get(&job.job_id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), JobStatus::Aggregating);
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let repo = InMemoryJobRepository::new();
        assert!(repo.update(&job()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let repo = InMemoryJobRepository::new();
        assert!(repo.get(&JobId::new_v4()).await.unwrap().is_none());
    }

    mod retention {
        use super::*;

        fn finished(status: JobStatus) -> JobRecord {
            let mut job = job();
            job.advance(JobStatus::Rendering);
            match status {
                JobStatus::Failed => job.fail("boom"),
                _ => job.complete(),
            }
            job
        }

        #[tokio::test]
        async fn insert_evicts_expired_finished_jobs() {
            let repo = InMemoryJobRepository::with_retention(Duration::ZERO);
            let queued = job();
            let mut running = job();
            running.advance(JobStatus::Fetching);
            let completed = finished(JobStatus::Completed);
            let failed = finished(JobStatus::Failed);
            for j in [&queued, &running, &completed, &failed] {
                repo.insert(j).await.unwrap();
            }
            tokio::time::sleep(Duration::from_millis(5)).await;

            let next = job();
            repo.insert(&next).await.unwrap();

            assert!(repo.get(&completed.job_id()).await.unwrap().is_none());
            assert!(repo.get(&failed.job_id()).await.unwrap().is_none());
            assert!(repo.get(&queued.job_id()).await.unwrap().is_some());
            assert!(repo.get(&running.job_id()).await.unwrap().is_some());
            assert!(repo.get(&next.job_id()).await.unwrap().is_some());
            assert_eq!(repo.len(), 3);
        }

        #[tokio::test]
        async fn recent_finished_jobs_are_kept() {
            let repo = InMemoryJobRepository::with_retention(Duration::from_secs(3600));
            let completed = finished(JobStatus::Completed);
            repo.insert(&completed).await.unwrap();
            repo.insert(&job()).await.unwrap();

            assert!(repo.get(&completed.job_id()).await.unwrap().is_some());
            assert_eq!(repo.retention(), Some(Duration::from_secs(3600)));
        }

        #[tokio::test]
        async fn without_retention_nothing_is_evicted() {
            let repo = InMemoryJobRepository::new();
            let failed = finished(JobStatus::Failed);
            repo.insert(&failed).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
            repo.insert(&job()).await.unwrap();

            assert_eq!(repo.len(), 2);
            assert!(repo.retention().is_none());
        }

        #[test]
        fn prune_uses_last_transition_time() {
            let repo = InMemoryJobRepository::new();
            let completed = finished(JobStatus::Completed);
            repo.jobs.insert(completed.job_id(), completed.clone());

            assert_eq!(repo.prune_finished_before(completed.updated_at()), 0);
            let later = Timestamp::from(
                *completed.updated_at().as_datetime() + chrono::Duration::seconds(1),
            );
            assert_eq!(repo.prune_finished_before(later), 1);
            assert!(repo.is_empty());
        }
    }
}
