//! # Fare Area Catalog
//!
//! The delivery areas priced by a fare fan-out. A built-in list of Kuwait
//! areas is used unless a catalog file is configured; the file is a JSON
//! array of `{area, block, lat, lng}` records.

use crate::domain::entities::FareArea;
use crate::domain::value_objects::GeoPoint;
use crate::infrastructure::geography::{CatalogError, CatalogResult};
use serde::Deserialize;
use std::path::Path;

const KUWAIT_AREAS: [(&str, &str, f64, f64); 10] = [
    ("Salmiya", "1", 29.3339, 48.0753),
    ("Hawally", "2", 29.3328, 48.0286),
    ("Kuwait City", "3", 29.3759, 47.9774),
    ("Jabriya", "4", 29.3180, 48.0290),
    ("Farwaniya", "1", 29.2775, 47.9586),
    ("Fahaheel", "5", 29.0825, 48.1303),
    ("Mangaf", "2", 29.0961, 48.1322),
    ("Rumaithiya", "6", 29.3117, 48.0753),
    ("Mishref", "3", 29.2744, 48.0630),
    ("Salwa", "7", 29.2958, 48.0786),
];

#[derive(Debug, Deserialize)]
struct FareAreaRecord {
    area: String,
    #[serde(default)]
    block: String,
    lat: f64,
    lng: f64,
}

/// Returns the built-in delivery areas.
#[must_use]
pub fn builtin_areas() -> Vec<FareArea> {
    KUWAIT_AREAS
        .iter()
        .filter_map(|&(area, block, lat, lng)| {
            GeoPoint::new(lat, lng)
                .ok()
                .map(|location| FareArea::new(area, block, location))
        })
        .collect()
}

/// Loads delivery areas from a JSON catalog file.
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read and
/// `CatalogError::Parse` if it is malformed or carries invalid coordinates.
pub async fn load_areas(path: &Path) -> CatalogResult<Vec<FareArea>> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    let records: Vec<FareAreaRecord> =
        serde_json::from_slice(&raw).map_err(|e| CatalogError::parse(path, e))?;

    records
        .into_iter()
        .map(|r| {
            GeoPoint::new(r.lat, r.lng)
                .map(|location| FareArea::new(r.area, r.block, location))
                .map_err(|e| CatalogError::parse(path, e))
        })
        .collect()
}
