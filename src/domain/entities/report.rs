//! # Report Table and Artifact
//!
//! The tabular shape every aggregation produces, and the identity of the
//! spreadsheet rendered from it.
//!
//! A [`ReportTable`] is an ordered list of columns plus rows of typed cells.
//! The first column is always the primary key (user or area name); measure
//! columns follow in a fixed order and, where present, `Total` is last.
//!
//! # Examples
//!
//! ```
//! use delivery_reports::domain::entities::report::{CellValue, ReportColumn, ReportTable};
//!
//! let mut table = ReportTable::new(
//!     "Number of Orders",
//!     vec![ReportColumn::new("User Name", 25.0), ReportColumn::new("Number of Orders", 18.0)],
//! );
//! table.push_row(vec![CellValue::text("alice"), CellValue::Integer(3)]);
//!
//! assert_eq!(table.cell("alice", "Number of Orders"), Some(&CellValue::Integer(3)));
//! ```

use crate::domain::value_objects::{JobId, ReportKind, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Header of the trailing total column.
pub const TOTAL_COLUMN: &str = "Total";

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Free text (keys).
    Text(String),
    /// Counts.
    Integer(u64),
    /// Money, already rounded.
    Decimal(Decimal),
    /// Other floating point measures.
    Number(f64),
    /// Missing measure.
    Empty,
}

impl CellValue {
    /// Creates a text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a number cell, or an empty cell for `None`.
    #[must_use]
    pub fn optional_number(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }

    /// Returns the text, if this is a text cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the count, if this is an integer cell.
    #[must_use]
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the decimal, if this is a decimal cell.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns true for an empty cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Column header with its display-width hint.
///
/// Widths are fixed per report kind, not measured from content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportColumn {
    header: String,
    width: f64,
}

impl ReportColumn {
    /// Creates a column.
    #[must_use]
    pub fn new(header: impl Into<String>, width: f64) -> Self {
        Self {
            header: header.into(),
            width,
        }
    }

    /// Column header.
    #[inline]
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Display width in spreadsheet character units.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }
}

/// An ordered table ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    sheet_name: String,
    columns: Vec<ReportColumn>,
    rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new(sheet_name: impl Into<String>, columns: Vec<ReportColumn>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    ///
    /// Rows shorter than the column list are padded with empty cells; extra
    /// cells are dropped.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Worksheet name.
    #[inline]
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Columns in display order.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[ReportColumn] {
        &self.columns
    }

    /// Column headers in display order.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(ReportColumn::header).collect()
    }

    /// Rows in display order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by header.
    #[must_use]
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.header == header)
    }

    /// Row whose primary key equals `key`.
    #[must_use]
    pub fn row(&self, key: &str) -> Option<&[CellValue]> {
        self.rows
            .iter()
            .find(|row| row.first().and_then(CellValue::as_text) == Some(key))
            .map(Vec::as_slice)
    }

    /// Cell at row `key`, column `header`.
    #[must_use]
    pub fn cell(&self, key: &str, header: &str) -> Option<&CellValue> {
        let idx = self.column_index(header)?;
        self.row(key).and_then(|row| row.get(idx))
    }

    /// Primary keys in row order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().and_then(CellValue::as_text))
            .collect()
    }
}

/// What a job produced: a table rendered for a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "report", rename_all = "snake_case")]
pub enum ArtifactKind {
    /// An aggregation report.
    Report(ReportKind),
    /// A fare fan-out sheet.
    FareEstimates,
}

impl ArtifactKind {
    /// Suffix appended to the client name in file names.
    #[must_use]
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Report(kind) => kind.file_suffix(),
            Self::FareEstimates => "fare_estimates",
        }
    }

    /// Human readable title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Report(kind) => kind.title(),
            Self::FareEstimates => "Fare Estimates",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_suffix())
    }
}

/// A persisted, rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArtifact {
    /// Job that produced the artifact.
    pub job_id: JobId,
    /// What was rendered.
    pub kind: ArtifactKind,
    /// Client the report was generated for.
    pub client_name: String,
    /// Attachment name presented to recipients.
    pub attachment_name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Size in bytes.
    pub size_bytes: u64,
    /// When the artifact was written.
    pub created_at: Timestamp,
}
