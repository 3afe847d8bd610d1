//! # HTTP Client
//!
//! Shared reqwest wrapper used by the transaction source and the fare
//! estimator.
//!
//! - Request timeout on every call
//! - JSON serialization/deserialization
//! - Status codes mapped to [`UpstreamError`]
//!
//! # Examples
//!
//! ```ignore
//! use delivery_reports::infrastructure::http::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let records: Vec<TransactionRecord> = client.get_with_params(url, &params).await?;
//! ```

use crate::infrastructure::http::error::{UpstreamError, UpstreamResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper with timeout and error mapping.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> UpstreamResult<Self> {
        Self::with_headers(timeout_ms, HeaderMap::new())
    }

    /// Creates a new HTTP client sending `default_headers` on every request.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Internal` if the client cannot be created.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> UpstreamResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| UpstreamError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request with query parameters and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails, a status error for
    /// non-2xx responses, and `UpstreamError::Protocol` if the body cannot be
    /// parsed.
    pub async fn get_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> UpstreamResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }

    /// Makes a POST request with a JSON body and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::get_with_params`].
    pub async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> UpstreamResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }
}

/// Checks the status and deserializes a JSON body.
async fn handle_response<T: DeserializeOwned>(response: Response) -> UpstreamResult<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::protocol(format!("Failed to parse response: {}", e)))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::timeout("Request timed out")
    } else if error.is_connect() {
        UpstreamError::connection(format!("Connection failed: {}", error))
    } else {
        UpstreamError::connection(format!("HTTP request failed: {}", error))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> UpstreamError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            UpstreamError::invalid_request(format!("Bad request: {}", body))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            UpstreamError::authentication(format!("Authentication failed: {}", body))
        }
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::rate_limited("Rate limit exceeded"),
        s if s.is_server_error() => UpstreamError::server(s.as_u16(), body),
        _ => UpstreamError::protocol(format!("HTTP error ({}): {}", status, body)),
    }
}
