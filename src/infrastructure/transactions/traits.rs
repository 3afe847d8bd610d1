//! # Transaction Source Port

use crate::domain::entities::TransactionRecord;
use crate::domain::value_objects::DateRange;
use crate::infrastructure::http::UpstreamResult;
use async_trait::async_trait;
use std::fmt;

/// Parameters of one transaction fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Filter key understood by the transaction service.
    pub filter_by: String,
    /// Inclusive date range.
    pub range: DateRange,
}

impl TransactionQuery {
    /// Creates a query.
    #[must_use]
    pub fn new(filter_by: impl Into<String>, range: DateRange) -> Self {
        Self {
            filter_by: filter_by.into(),
            range,
        }
    }
}

/// Source of delivery-order transactions.
#[async_trait]
pub trait TransactionSource: Send + Sync + fmt::Debug {
    /// Fetches every record matching the query.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`](crate::infrastructure::http::UpstreamError)
    /// for non-success statuses, transport failures and malformed payloads.
    async fn fetch(&self, query: &TransactionQuery) -> UpstreamResult<Vec<TransactionRecord>>;
}
