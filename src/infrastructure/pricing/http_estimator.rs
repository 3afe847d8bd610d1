//! # HTTP Fare Estimator
//!
//! Posts `{pickup, dropoff, template_id}` to the estimator endpoint with the
//! static API key in the `X-Api-Key` header.

use crate::infrastructure::http::{HttpClient, UpstreamError, UpstreamResult};
use crate::infrastructure::pricing::traits::{FareEstimator, FareQuote, FareRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

/// Header carrying the estimator credentials.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Fare estimator backed by the remote pricing API.
#[derive(Debug, Clone)]
pub struct HttpFareEstimator {
    client: HttpClient,
    endpoint: String,
}

impl HttpFareEstimator {
    /// Creates an estimator for `endpoint` authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Internal` if the key is not a valid header
    /// value or the client cannot be built.
    pub fn new(endpoint: impl Into<String>, api_key: &str, timeout_ms: u64) -> UpstreamResult<Self> {
        let mut headers = HeaderMap::new();
        if !api_key.is_empty() {
            let mut value = HeaderValue::from_str(api_key)
                .map_err(|e| UpstreamError::internal(format!("Invalid API key header: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }
        Ok(Self {
            client: HttpClient::with_headers(timeout_ms, headers)?,
            endpoint: endpoint.into(),
        })
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FareEstimator for HttpFareEstimator {
    async fn estimate(&self, request: &FareRequest) -> UpstreamResult<FareQuote> {
        self.client.post(&self.endpoint, request).await
    }
}
