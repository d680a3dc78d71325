//! File parsing module.
//!
//! This module turns an uploaded file into a raw [`Dataset`]:
//! - Dispatch on the file extension
//! - Delimited text (CSV/TSV/TXT) via the `csv` crate, every cell a string
//! - Spreadsheets (XLSX/XLSM/XLSB/XLS/ODS) via `calamine`, first sheet only,
//!   native numeric and string cells
//!
//! Header cells are kept verbatim apart from naming empty cells and
//! disambiguating repeats; trimming is left to the cleaner.

mod delimited;
mod spreadsheet;

use crate::error::{InsightError, Result};
use crate::types::Dataset;
use crate::utils::unique_name;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use delimited::sniff_delimiter;

/// Name given to a header cell with no text.
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Supported input families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text. `None` means the delimiter is sniffed from the first line.
    Delimited { delimiter: Option<u8> },
    /// Spreadsheet workbook; only the first sheet is read.
    Spreadsheet,
}

impl FileFormat {
    /// Pick the format from a file name's extension (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Delimited {
                delimiter: Some(b','),
            }),
            "tsv" | "tab" => Ok(FileFormat::Delimited {
                delimiter: Some(b'\t'),
            }),
            "txt" => Ok(FileFormat::Delimited { delimiter: None }),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Spreadsheet),
            _ => Err(InsightError::UnsupportedFormat {
                name: name.to_string(),
                extension,
            }),
        }
    }

    /// Short label used in error messages and logs.
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Delimited { .. } => "delimited text",
            FileFormat::Spreadsheet => "spreadsheet",
        }
    }
}

/// Parse a file's content into a raw dataset.
///
/// `name` only drives format dispatch. No size limit is applied here.
///
/// # Errors
///
/// Returns [`InsightError::UnsupportedFormat`] for an unknown extension and
/// [`InsightError::Decode`] when the content cannot be decoded.
pub fn parse_file(name: &str, content: &[u8]) -> Result<Dataset> {
    let format = FileFormat::from_name(name)?;
    debug!("Parsing '{}' as {} ({} bytes)", name, format.label(), content.len());

    let dataset = match format {
        FileFormat::Delimited { delimiter } => {
            let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));
            delimited::parse_delimited(content, delimiter)?
        }
        FileFormat::Spreadsheet => spreadsheet::parse_spreadsheet(content)?,
    };

    debug!(
        "Parsed {} rows x {} columns from '{}'",
        dataset.len(),
        dataset.width(),
        name
    );
    Ok(dataset)
}

/// Turn raw header cells into unique column names.
///
/// Blank cells become `__EMPTY`; a name already taken gets `_1`, `_2`, ...
/// appended. The first occurrence keeps the bare name.
pub(crate) fn build_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut taken: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();

    for cell in raw {
        let cell: String = cell.into();
        let base = if cell.trim().is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            cell
        };
        let name = unique_name(&base, &taken);
        taken.insert(name.clone());
        headers.push(name);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_format_dispatch() {
        assert_eq!(
            FileFormat::from_name("data.csv").unwrap(),
            FileFormat::Delimited {
                delimiter: Some(b',')
            }
        );
        assert_eq!(
            FileFormat::from_name("DATA.TSV").unwrap(),
            FileFormat::Delimited {
                delimiter: Some(b'\t')
            }
        );
        assert_eq!(
            FileFormat::from_name("notes.txt").unwrap(),
            FileFormat::Delimited { delimiter: None }
        );
        assert_eq!(
            FileFormat::from_name("Report.XLSX").unwrap(),
            FileFormat::Spreadsheet
        );
        assert_eq!(
            FileFormat::from_name("legacy.xls").unwrap(),
            FileFormat::Spreadsheet
        );
    }

    #[test]
    fn test_unsupported_format() {
        let err = FileFormat::from_name("slides.pdf").unwrap_err();
        assert!(matches!(
            err,
            InsightError::UnsupportedFormat { ref extension, .. } if extension == "pdf"
        ));

        let err = FileFormat::from_name("no_extension").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_build_headers_verbatim() {
        let headers = build_headers(vec!["A", " B ", "c"]);
        assert_eq!(headers, vec!["A", " B ", "c"]);
    }

    #[test]
    fn test_build_headers_empty_and_repeated() {
        let headers = build_headers(vec!["", "x", "", "x", "  ", "x_1"]);
        assert_eq!(
            headers,
            vec!["__EMPTY", "x", "__EMPTY_1", "x_1", "__EMPTY_2", "x_1_1"]
        );
    }

    #[test]
    fn test_parse_file_csv() {
        let ds = parse_file("people.csv", b"name,age\nAda,36\nAlan,41\n").unwrap();
        assert_eq!(ds.headers, vec!["name", "age"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0, "age"), Some(&Value::text("36")));
    }

    #[test]
    fn test_parse_file_txt_sniffs_delimiter() {
        let ds = parse_file("export.txt", b"a;b\n1;2\n").unwrap();
        assert_eq!(ds.headers, vec!["a", "b"]);
        assert_eq!(ds.get(0, "b"), Some(&Value::text("2")));
    }

    #[test]
    fn test_parse_file_unsupported() {
        let err = parse_file("image.png", b"\x89PNG").unwrap_err();
        assert!(err.is_parse_error());
    }
}
