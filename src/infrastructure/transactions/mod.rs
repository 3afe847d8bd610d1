//! # Transaction Source
//!
//! Port and HTTP adapter for the remote transaction-data service.
//!
//! - [`TransactionSource`]: fetches records for a filter key and date range
//! - [`HttpTransactionSource`]: `GET` adapter built on [`HttpClient`]
//!
//! [`HttpClient`]: crate::infrastructure::http::HttpClient

pub mod http_source;
pub mod traits;

pub use http_source::HttpTransactionSource;
pub use traits::{TransactionQuery, TransactionSource};
