//! # Domain Entities
//!
//! - [`TransactionRecord`]: one delivery-order transaction
//! - [`ReportTable`], [`ReportArtifact`]: aggregation output and its rendered form
//! - [`JobRecord`]: observable state of a background job
//! - [`FareArea`], [`FareEstimateResult`]: fare fan-out catalog and results

pub mod fare;
pub mod job;
pub mod report;
pub mod transaction;

pub use fare::{FareArea, FareEstimateResult};
pub use job::{JobFailure, JobRecord, JobStatus};
pub use report::{ArtifactKind, CellValue, ReportArtifact, ReportColumn, ReportTable};
pub use transaction::{TaskLocation, TransactionRecord};
