//! Core data types shared by the parser, cleaner and summarizer.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Cell values
// ============================================================================

/// A single loosely-typed cell value.
///
/// Serializes untagged, so a row renders as a plain JSON object of
/// `null`, numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// True for `Null` and for text that is empty after trimming.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(_) => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Render a number the way it reads in a report: integral values without a
/// trailing `.0`, negative zero as `0`.
///
/// Magnitudes from `1e21` up and below `1e-6` switch to exponent form with a
/// signed exponent (`1e+21`, `1.5e-7`), matching JavaScript's `String(n)`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }
    format!("{}", n)
}

// ============================================================================
// Rows and datasets
// ============================================================================

/// One record: column name to value. An absent key reads as "undefined".
pub type Row = HashMap<String, Value>;

/// Ordered rows plus the header order they share.
///
/// The header sequence is computed once when the dataset is built and
/// carried alongside the rows, since a [`Row`] has no key order of its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Build a dataset from bare rows, inferring the header set from the first
    /// row. Keys are sorted since a map carries no column order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut headers: Vec<String> = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        headers.sort();
        Self { headers, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Look up a cell; absent keys read as `None`.
    pub fn get<'a>(&'a self, row: usize, header: &str) -> Option<&'a Value> {
        self.rows.get(row).and_then(|r| r.get(header))
    }

    /// All values of one column in row order. Absent cells come back as `Null`.
    pub fn column_values<'a>(&'a self, header: &str) -> Vec<&'a Value> {
        const NULL: &Value = &Value::Null;
        self.rows
            .iter()
            .map(|row| row.get(header).unwrap_or(NULL))
            .collect()
    }

    /// Classify a column from its present (non-null) values.
    ///
    /// Numeric iff every present value is a number. This is recomputed on
    /// every call; nothing is cached on the dataset.
    pub fn column_kind(&self, header: &str) -> ColumnKind {
        let all_numeric = self
            .rows
            .iter()
            .filter_map(|row| row.get(header))
            .filter(|v| !v.is_null())
            .all(Value::is_number);

        if all_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Convert to a polars `DataFrame` for charting and export collaborators.
    ///
    /// Numeric columns become `Float64`, categorical columns become `String`
    /// with numbers rendered through [`format_number`]. Fails with
    /// [`crate::InsightError::Polars`] when polars rejects the columns, for
    /// example on repeated header names.
    pub fn to_dataframe(&self) -> crate::error::Result<DataFrame> {
        let columns: Vec<Column> = self
            .headers
            .iter()
            .map(|header| {
                let values = self.column_values(header);
                match self.column_kind(header) {
                    ColumnKind::Numeric => {
                        let data: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
                        Column::new(header.as_str().into(), data)
                    }
                    ColumnKind::Categorical => {
                        let data: Vec<Option<String>> = values
                            .iter()
                            .map(|v| match v {
                                Value::Null => None,
                                other => Some(other.to_string()),
                            })
                            .collect();
                        Column::new(header.as_str().into(), data)
                    }
                }
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

// ============================================================================
// Summary types
// ============================================================================

/// Derived column classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// One equal-width histogram bin. `left` is inclusive; `right` is exclusive
/// except on the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    /// Number of numeric values the statistics were computed over
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub histogram: Vec<HistogramBin>,
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

impl fmt::Display for ValueCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} times)", self.value, self.count)
    }
}

/// Cardinality and most frequent values of a categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub unique_count: usize,
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "stats", rename_all = "lowercase")]
pub enum ColumnStats {
    /// `None` when the column holds no numeric values at all
    Numeric(Option<NumericStats>),
    Categorical(CategoricalStats),
}

impl ColumnStats {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnStats::Numeric(_) => ColumnKind::Numeric,
            ColumnStats::Categorical(_) => ColumnKind::Categorical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub stats: ColumnStats,
}

/// Structured form of the summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub column_summaries: Vec<ColumnSummary>,
}
