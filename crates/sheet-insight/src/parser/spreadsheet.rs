//! Spreadsheet reader backed by `calamine`.

use super::build_headers;
use crate::error::{InsightError, Result};
use crate::types::{Dataset, Row, Value};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

const FORMAT: &str = "spreadsheet";

/// Read the first sheet of a workbook held in memory.
///
/// The first row is the header. Rows with no non-empty cell are skipped.
pub(crate) fn parse_spreadsheet(content: &[u8]) -> Result<Dataset> {
    let cursor = Cursor::new(content.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| InsightError::decode(FORMAT, e))?;

    let sheet_names = workbook.sheet_names();
    debug!("Workbook sheets: {:?}", sheet_names);

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InsightError::decode(FORMAT, "workbook contains no sheets"))?
        .map_err(|e| InsightError::decode(FORMAT, e))?;

    let mut sheet_rows = range.rows();

    let headers = match sheet_rows.next() {
        Some(cells) => build_headers(cells.iter().map(header_text)),
        None => {
            debug!("First sheet is empty");
            return Ok(Dataset::default());
        }
    };

    let mut rows = Vec::new();
    let mut blank = 0usize;
    for cells in sheet_rows {
        let row = cells_to_row(&headers, cells);
        if row.is_empty() {
            blank += 1;
            continue;
        }
        rows.push(row);
    }

    if blank > 0 {
        debug!("Skipped {} blank sheet rows", blank);
    }

    Ok(Dataset::new(headers, rows))
}

/// Map a worksheet cell to a value.
///
/// Numbers stay numeric (dates as their Excel serial), booleans and error
/// cells become their text, empty cells become `Null`.
pub(crate) fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::text(s.as_str()),
        Data::Bool(b) => Value::text(b.to_string()),
        Data::Error(e) => Value::text(e.to_string()),
        Data::Empty => Value::Null,
    }
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell) {
        Value::Null => String::new(),
        value => value.to_string(),
    }
}

/// Empty cells are left out of the row so they read as absent.
fn cells_to_row(headers: &[String], cells: &[Data]) -> Row {
    headers
        .iter()
        .zip(cells)
        .filter_map(|(header, cell)| match cell_value(cell) {
            Value::Null => None,
            value => Some((header.clone(), value)),
        })
        .collect()
}
