//! # HTTP Transaction Source
//!
//! `GET {base_url}?filter_by=..&start_date=..&end_date=..` returning a JSON
//! array of transaction records.
//!
//! The array is decoded element by element. A record that does not match the
//! wire shape is logged and dropped; the rest of the payload is kept.

use crate::domain::entities::TransactionRecord;
use crate::infrastructure::http::{HttpClient, UpstreamResult};
use crate::infrastructure::transactions::traits::{TransactionQuery, TransactionSource};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Transaction source backed by the remote transaction service.
#[derive(Debug, Clone)]
pub struct HttpTransactionSource {
    client: HttpClient,
    base_url: String,
}

impl HttpTransactionSource {
    /// Creates a source for `base_url` using `client`.
    #[must_use]
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionSource {
    async fn fetch(&self, query: &TransactionQuery) -> UpstreamResult<Vec<TransactionRecord>> {
        let params = [
            ("filter_by", query.filter_by.clone()),
            ("start_date", query.range.start_param()),
            ("end_date", query.range.end_param()),
        ];
        debug!(
            url = %self.base_url,
            filter_by = %query.filter_by,
            start_date = %params[1].1,
            end_date = %params[2].1,
            "fetching transactions"
        );

        let raw: Vec<Value> = self.client.get_with_params(&self.base_url, &params).await?;
        let received = raw.len();
        let records: Vec<TransactionRecord> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed transaction record");
                    None
                }
            })
            .collect();

        info!(
            count = records.len(),
            skipped = received - records.len(),
            filter_by = %query.filter_by,
            "fetched transactions"
        );
        Ok(records)
    }
}
