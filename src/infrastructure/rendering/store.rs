//! # Artifact Store
//!
//! Persists rendered spreadsheets and names them.
//!
//! The file name on disk depends on [`ArtifactNaming`]:
//!
//! | naming    | file name                              |
//! |-----------|----------------------------------------|
//! | `per_job` | `<client>_<suffix>_<job_id>.xlsx`      |
//! | `legacy`  | `<client>_<suffix>.xlsx` (overwrites)  |
//!
//! The attachment name shown to recipients is always
//! `<client>_<suffix>.xlsx`.

use crate::domain::entities::{ArtifactKind, ReportArtifact};
use crate::domain::value_objects::{ArtifactNaming, JobId, Timestamp};
use crate::infrastructure::rendering::error::{RenderError, RenderResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "xlsx";
const FALLBACK_CLIENT: &str = "client";

/// Replaces every character that is not alphanumeric, `-` or `_` with `_`.
///
/// Blank names become `client`.
#[must_use]
pub fn sanitize_client_name(client_name: &str) -> String {
    let trimmed = client_name.trim();
    if trimmed.is_empty() {
        return FALLBACK_CLIENT.to_string();
    }
    trimmed
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Attachment name presented to recipients.
#[must_use]
pub fn attachment_name(client_name: &str, kind: ArtifactKind) -> String {
    format!(
        "{}_{}.{}",
        sanitize_client_name(client_name),
        kind.file_suffix(),
        EXTENSION
    )
}

/// Durable storage for rendered artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync + fmt::Debug {
    /// Persists `bytes` as the artifact of `job_id`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Storage` if the artifact cannot be written.
    async fn persist(
        &self,
        job_id: JobId,
        kind: ArtifactKind,
        client_name: &str,
        bytes: &Bytes,
    ) -> RenderResult<ReportArtifact>;
}

/// [`ArtifactStore`] writing into a local directory.
#[derive(Debug, Clone)]
pub struct FileSystemArtifactStore {
    output_dir: PathBuf,
    naming: ArtifactNaming,
}

impl FileSystemArtifactStore {
    /// Creates a store writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, naming: ArtifactNaming) -> Self {
        Self {
            output_dir: output_dir.into(),
            naming,
        }
    }

    /// Output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Naming scheme.
    #[must_use]
    pub fn naming(&self) -> ArtifactNaming {
        self.naming
    }

    /// File name for an artifact under the configured naming scheme.
    #[must_use]
    pub fn file_name(&self, job_id: JobId, kind: ArtifactKind, client_name: &str) -> String {
        let client = sanitize_client_name(client_name);
        match self.naming {
            ArtifactNaming::PerJob => format!(
                "{}_{}_{}.{}",
                client,
                kind.file_suffix(),
                job_id.simple(),
                EXTENSION
            ),
            ArtifactNaming::Legacy => format!("{}_{}.{}", client, kind.file_suffix(), EXTENSION),
        }
    }
}

#[async_trait]
impl ArtifactStore for FileSystemArtifactStore {
    async fn persist(
        &self,
        job_id: JobId,
        kind: ArtifactKind,
        client_name: &str,
        bytes: &Bytes,
    ) -> RenderResult<ReportArtifact> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| RenderError::storage(&self.output_dir, e))?;

        let path = self.output_dir.join(self.file_name(job_id, kind, client_name));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| RenderError::storage(&path, e))?;

        debug!(%job_id, path = %path.display(), size = bytes.len(), "artifact written");

        Ok(ReportArtifact {
            job_id,
            kind,
            client_name: client_name.to_string(),
            attachment_name: attachment_name(client_name, kind),
            path,
            size_bytes: bytes.len() as u64,
            created_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ReportKind;

    const KIND: ArtifactKind = ArtifactKind::Report(ReportKind::HourlyOrders);

    #[test]
    fn client_names_are_sanitized() {
        assert_eq!(sanitize_client_name("acme"), "acme");
        assert_eq!(sanitize_client_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_client_name("Acme Co."), "Acme_Co_");
        assert_eq!(sanitize_client_name("  "), "client");
    }

    #[test]
    fn attachment_name_never_carries_job_id() {
        assert_eq!(attachment_name("acme", KIND), "acme_hourly_orders.xlsx");
        assert_eq!(
            attachment_name("acme", ArtifactKind::FareEstimates),
            "acme_fare_estimates.xlsx"
        );
    }

    mod naming {
        use super::*;

        #[tokio::test]
        async fn per_job_names_never_collide() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileSystemArtifactStore::new(dir.path(), ArtifactNaming::PerJob);

            let first = store
                .persist(JobId::new_v4(), KIND, "acme", &Bytes::from_static(b"one"))
                .await
                .unwrap();
            let second = store
                .persist(JobId::new_v4(), KIND, "acme", &Bytes::from_static(b"two"))
                .await
                .unwrap();

            assert_ne!(first.path, second.path);
            assert_eq!(tokio::fs::read(&first.path).await.unwrap(), b"one");
            assert_eq!(tokio::fs::read(&second.path).await.unwrap(), b"two");
            assert_eq!(first.attachment_name, second.attachment_name);
        }

        #[tokio::test]
        async fn legacy_names_overwrite() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileSystemArtifactStore::new(dir.path(), ArtifactNaming::Legacy);

            let first = store
                .persist(JobId::new_v4(), KIND, "acme", &Bytes::from_static(b"one"))
                .await
                .unwrap();
            let second = store
                .persist(JobId::new_v4(), KIND, "acme", &Bytes::from_static(b"two"))
                .await
                .unwrap();

            assert_eq!(first.path, second.path);
            assert_eq!(
                first.path.file_name().unwrap().to_str().unwrap(),
                "acme_hourly_orders.xlsx"
            );
            assert_eq!(tokio::fs::read(&first.path).await.unwrap(), b"two");
        }

        #[test]
        fn per_job_file_name_embeds_job_id() {
            let store = FileSystemArtifactStore::new("/tmp", ArtifactNaming::PerJob);
            let job_id = JobId::new_v4();
            let name = store.file_name(job_id, KIND, "acme");
            assert_eq!(name, format!("acme_hourly_orders_{}.xlsx", job_id.simple()));
        }
    }

    #[tokio::test]
    async fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("2025");
        let store = FileSystemArtifactStore::new(&nested, ArtifactNaming::PerJob);

        let artifact = store
            .persist(JobId::new_v4(), KIND, "acme", &Bytes::from_static(b"data"))
            .await
            .unwrap();
        assert!(artifact.path.starts_with(&nested));
        assert_eq!(artifact.size_bytes, 4);
    }

    #[tokio::test]
    async fn unwritable_target_is_storage_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot act as the output directory.
        let store = FileSystemArtifactStore::new(file.path(), ArtifactNaming::PerJob);
        let err = store
            .persist(JobId::new_v4(), KIND, "acme", &Bytes::from_static(b"data"))
            .await
            .unwrap_err();
        assert!(err.is_storage());
    }
}
