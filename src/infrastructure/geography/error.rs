//! # Catalog Errors

use std::path::Path;
use thiserror::Error;

/// Error loading a file-backed catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalog {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        message: String,
    },

    /// The file is not a valid catalog document.
    #[error("invalid catalog {path}: {message}")]
    Parse {
        /// File path.
        path: String,
        /// Underlying error.
        message: String,
    },
}

impl CatalogError {
    /// Creates an I/O error.
    #[must_use]
    pub fn io(path: &Path, message: impl ToString) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for catalog loading.
pub type CatalogResult<T> = Result<T, CatalogError>;
