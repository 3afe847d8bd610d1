//! # Geography Catalog Port and Adapters
//!
//! The catalog document is a JSON array of neighborhood records:
//!
//! ```json
//! [
//!   {"name": "Salmiya", "aliases": "Salmiya, Salmiya Block 1, السالمية"},
//!   {"name": "Hawally", "aliases": "Hawally, Hawalli"}
//! ]
//! ```
//!
//! Both fields are optional. The catalog is read again for every job that
//! needs it, so edits to the file take effect without a restart.

use crate::domain::services::area_alias::CatalogEntry;
use crate::infrastructure::geography::error::{CatalogError, CatalogResult};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of neighborhood records.
#[async_trait]
pub trait GeographyCatalog: Send + Sync + fmt::Debug {
    /// Loads all neighborhood records in catalog order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the source cannot be read or parsed.
    async fn load(&self) -> CatalogResult<Vec<CatalogEntry>>;
}

/// Catalog read from a JSON file.
#[derive(Debug, Clone)]
pub struct FileGeographyCatalog {
    path: PathBuf,
}

impl FileGeographyCatalog {
    /// Creates a catalog reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the catalog path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GeographyCatalog for FileGeographyCatalog {
    async fn load(&self) -> CatalogResult<Vec<CatalogEntry>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CatalogError::io(&self.path, e))?;
        let entries: Vec<CatalogEntry> =
            serde_json::from_slice(&raw).map_err(|e| CatalogError::parse(&self.path, e))?;
        debug!(path = %self.path.display(), entries = entries.len(), "loaded geography catalog");
        Ok(entries)
    }
}

/// Catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticGeographyCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticGeographyCatalog {
    /// Creates a catalog over `entries`.
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl GeographyCatalog for StaticGeographyCatalog {
    async fn load(&self) -> CatalogResult<Vec<CatalogEntry>> {
        Ok(self.entries.clone())
    }
}
