//! Built-in demo dataset.
//!
//! Used by the CLI's `--sample` flag when no file is at hand. Cells are raw
//! strings, the way the delimited parser produces them, so the sample goes
//! through the same cleaning as an upload.

use crate::types::{Dataset, Row, Value};

const HEADERS: [&str; 4] = ["x", "y", "z", "cat"];

const ROWS: [[&str; 4]; 5] = [
    ["1", "2", "10.0", "a"],
    ["2", "1", "11.5", "a"],
    ["3", "3", "9.0", "b"],
    ["4", "5", "12.0", "b"],
    ["5", "4", "10.5", "a"],
];

/// Three numeric columns and one categorical column, five rows.
pub fn sample_dataset() -> Dataset {
    let headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let rows = ROWS
        .iter()
        .map(|cells| {
            headers
                .iter()
                .zip(cells)
                .map(|(header, cell)| (header.clone(), Value::text(*cell)))
                .collect::<Row>()
        })
        .collect();

    Dataset::new(headers, rows)
}
