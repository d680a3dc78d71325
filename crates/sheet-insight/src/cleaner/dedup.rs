//! Row keys used for duplicate detection.

use crate::config::DedupMode;
use crate::types::{Row, Value};
use crate::utils::parse_finite_number;
use std::collections::HashSet;

/// A cell in the form it will take after numeric coercion.
///
/// Numbers compare by bit pattern (with `-0` folded into `0`), which is
/// exact equality for the finite values coercion can produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum CellKey {
    Missing,
    Number(u64),
    Text(String),
}

impl CellKey {
    /// Key for one cell. Text is read as a number only when `coerce` is set,
    /// i.e. when the cell's column will be converted.
    pub(crate) fn from_value(value: Option<&Value>, coerce: bool) -> Self {
        match value {
            None | Some(Value::Null) => CellKey::Missing,
            Some(Value::Number(n)) => CellKey::number(*n),
            Some(Value::Text(s)) => match parse_finite_number(s).filter(|_| coerce) {
                Some(n) => CellKey::number(n),
                None => CellKey::Text(s.clone()),
            },
        }
    }

    fn number(n: f64) -> Self {
        let n = if n == 0.0 { 0.0 } else { n };
        CellKey::Number(n.to_bits())
    }
}

/// Build the comparison key for a row.
///
/// `ValueMultiset` sorts the cells so that column placement is ignored;
/// `KeyAware` keeps them in header order. Only columns in `coerced` compare
/// numeric-looking text as numbers.
pub(crate) fn row_key(
    row: &Row,
    headers: &[String],
    mode: DedupMode,
    coerced: &HashSet<&str>,
) -> Vec<CellKey> {
    let mut key: Vec<CellKey> = headers
        .iter()
        .map(|header| CellKey::from_value(row.get(header), coerced.contains(header.as_str())))
        .collect();

    if mode == DedupMode::ValueMultiset {
        key.sort();
    }
    key
}
