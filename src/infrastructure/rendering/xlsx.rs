//! # XLSX Renderer
//!
//! Writes a single worksheet: a bold header row, then one spreadsheet row
//! per table row. Column widths come from the table's width hints. Money
//! cells use a `0.00` number format and empty cells are left blank.

use crate::domain::entities::{CellValue, ReportTable};
use crate::infrastructure::rendering::error::RenderResult;
use bytes::Bytes;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fmt;

/// Longest worksheet name xlsx accepts.
const MAX_SHEET_NAME: usize = 31;

/// Renders report tables to spreadsheet bytes.
///
/// Rendering is synchronous CPU work; async callers should run it on a
/// blocking thread.
pub trait ReportRenderer: Send + Sync + fmt::Debug {
    /// Renders `table` to a complete spreadsheet document.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Workbook` if the document cannot be produced.
    fn render(&self, table: &ReportTable) -> RenderResult<Bytes>;
}

/// [`ReportRenderer`] producing Office Open XML workbooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReportRenderer;

impl XlsxReportRenderer {
    /// Creates a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for XlsxReportRenderer {
    fn render(&self, table: &ReportTable) -> RenderResult<Bytes> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(table.sheet_name()))?;

        write_table(sheet, table)?;

        let buffer = workbook.save_to_buffer()?;
        Ok(Bytes::from(buffer))
    }
}

fn write_table(sheet: &mut Worksheet, table: &ReportTable) -> RenderResult<()> {
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("0.00");

    for (col, column) in table.columns().iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, column.width())?;
        sheet.write_string_with_format(0, col, column.header(), &header_format)?;
    }

    for (row_num, row) in table.rows().iter().enumerate() {
        let row_idx = (row_num + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Text(s) => {
                    sheet.write_string(row_idx, col, s)?;
                }
                CellValue::Integer(n) => {
                    sheet.write_number(row_idx, col, *n as f64)?;
                }
                CellValue::Decimal(d) => {
                    let value = d.to_f64().unwrap_or_default();
                    sheet.write_number_with_format(row_idx, col, value, &money_format)?;
                }
                CellValue::Number(n) => {
                    sheet.write_number(row_idx, col, *n)?;
                }
                CellValue::Empty => {}
            }
        }
    }
    Ok(())
}

/// Strips characters xlsx forbids in sheet names and truncates to 31 chars.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Report".to_string()
    } else {
        cleaned
    }
}
