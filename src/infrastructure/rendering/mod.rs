//! # Report Rendering
//!
//! Turns a [`ReportTable`](crate::domain::entities::ReportTable) into a
//! spreadsheet and persists it.
//!
//! - [`ReportRenderer`] / [`XlsxReportRenderer`]: table → xlsx bytes
//! - [`ArtifactStore`] / [`FileSystemArtifactStore`]: bytes → file on disk

pub mod error;
pub mod store;
pub mod xlsx;

pub use error::{RenderError, RenderResult};
pub use store::{ArtifactStore, FileSystemArtifactStore, attachment_name, sanitize_client_name};
pub use xlsx::{ReportRenderer, XlsxReportRenderer};
