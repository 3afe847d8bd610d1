//! # Infrastructure Layer
//!
//! Adapters for the collaborators the report pipeline talks to.
//!
//! - [`http`]: shared reqwest client and upstream error mapping
//! - [`transactions`]: transaction data source
//! - [`pricing`]: fare estimator and fan-out area catalog
//! - [`geography`]: neighborhood catalog for area resolution
//! - [`rendering`]: xlsx rendering and artifact storage
//! - [`notification`]: email delivery
//! - [`persistence`]: job-status store

pub mod geography;
pub mod http;
pub mod notification;
pub mod persistence;
pub mod pricing;
pub mod rendering;
pub mod transactions;
