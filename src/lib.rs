//! # Delivery Reports
//!
//! Delivery-order analytics service. Transaction records fetched from a
//! remote service are aggregated into spreadsheet reports, stored on disk and
//! mailed to a configured recipient. A second job type prices one pickup
//! point against a fixed catalog of areas.
//!
//! Jobs run in the background; submitters get a job id back immediately and
//! poll the job-status store for progress.
//!
//! ## Layers
//!
//! - [`domain`]: records, report tables, job state and the area alias resolver
//! - [`application`]: aggregation strategies, fare fan-out and the dispatcher
//! - [`infrastructure`]: HTTP sources, xlsx rendering, storage, SMTP, job store
//! - [`api`]: axum REST surface
//! - [`config`]: layered configuration

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
