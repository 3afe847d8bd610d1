//! # Rendering Errors

use std::path::Path;
use thiserror::Error;

/// Error producing or persisting a report artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The workbook could not be built.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// The artifact could not be written.
    #[error("Storage error at {path}: {message}")]
    Storage {
        /// Target path.
        path: String,
        /// Underlying error.
        message: String,
    },
}

impl RenderError {
    /// Creates a workbook error.
    #[must_use]
    pub fn workbook(message: impl ToString) -> Self {
        Self::Workbook(message.to_string())
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage(path: &Path, message: impl ToString) -> Self {
        Self::Storage {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Returns true if the error happened while writing to disk.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

impl From<rust_xlsxwriter::XlsxError> for RenderError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::workbook(err)
    }
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
