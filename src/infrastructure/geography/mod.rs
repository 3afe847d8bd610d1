//! # Geography Catalog
//!
//! Sources of neighborhood records for the area alias resolver.
//!
//! - [`GeographyCatalog`]: port
//! - [`FileGeographyCatalog`]: JSON file on disk
//! - [`StaticGeographyCatalog`]: fixed in-memory list

pub mod catalog;
pub mod error;

pub use catalog::{FileGeographyCatalog, GeographyCatalog, StaticGeographyCatalog};
pub use error::{CatalogError, CatalogResult};
