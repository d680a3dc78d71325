//! Delimited-text reader (CSV, TSV and sniffed TXT).

use super::build_headers;
use crate::error::{InsightError, Result};
use crate::types::{Dataset, Row, Value};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Candidate delimiters, in tie-break order.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Pick the delimiter that occurs most often on the first line.
///
/// Falls back to a comma when none of the candidates occur.
pub(crate) fn sniff_delimiter(content: &[u8]) -> u8 {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let first_line = content
        .split(|&b| b == b'\n')
        .next()
        .unwrap_or_default();

    let mut best = b',';
    let mut best_count = 0;
    for candidate in DELIMITER_CANDIDATES {
        let count = first_line.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    debug!("Sniffed delimiter {:?}", best as char);
    best
}

/// Read delimited text: first record is the header, every cell a string.
///
/// Records whose cells are all blank are skipped. A short record leaves the
/// trailing columns absent; cells past the header width are ignored.
pub(crate) fn parse_delimited(content: &[u8], delimiter: u8) -> Result<Dataset> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let text = std::str::from_utf8(content)
        .map_err(|e| InsightError::decode("delimited text", format!("invalid UTF-8: {}", e)))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true) // Allow rows with different lengths
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let headers = match records.next() {
        Some(record) => {
            let record = record.map_err(|e| {
                InsightError::decode("delimited text", format!("failed to read header: {}", e))
            })?;
            build_headers(record.iter())
        }
        None => {
            debug!("Delimited input has no header row");
            return Ok(Dataset::default());
        }
    };

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    let mut blank = 0usize;

    for (index, record) in records.enumerate() {
        let record = record.map_err(|e| {
            InsightError::decode(
                "delimited text",
                format!("failed to parse row {}: {}", index + 1, e),
            )
        })?;

        if is_blank(&record) {
            blank += 1;
            continue;
        }
        if record.len() != headers.len() {
            ragged += 1;
        }

        rows.push(record_to_row(&headers, &record));
    }

    if blank > 0 {
        debug!("Skipped {} blank lines", blank);
    }
    if ragged > 0 {
        warn!(
            "{} rows had a different number of cells than the {} header columns",
            ragged,
            headers.len()
        );
    }

    Ok(Dataset::new(headers, rows))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

fn record_to_row(headers: &[String], record: &StringRecord) -> Row {
    headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            record
                .get(idx)
                .map(|cell| (header.clone(), Value::text(cell)))
        })
        .collect()
}
