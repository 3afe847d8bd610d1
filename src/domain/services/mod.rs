//! # Domain Services
//!
//! Stateless domain logic that does not belong to a single entity.
//!
//! - [`AreaAliasMap`]: resolves free-text addresses to canonical areas

pub mod area_alias;

pub use area_alias::{AreaAliasMap, CatalogEntry, UNKNOWN_AREA};
