//! # HTTP Plumbing
//!
//! Shared reqwest client and the error type for remote service calls.

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::{UpstreamError, UpstreamResult};
