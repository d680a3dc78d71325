//! Numeric coercion of string cells.

use crate::types::{Row, Value};
use crate::utils::parse_finite_number;
use std::collections::HashSet;

/// Convert one cell: numeric-looking text becomes a number, anything else is
/// returned unchanged.
pub(crate) fn coerce_value(value: &Value) -> Value {
    match value {
        Value::Text(s) => match parse_finite_number(s) {
            Some(n) => Value::Number(n),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

/// True when every present value in the column is a number or
/// numeric-looking text.
pub(crate) fn column_is_convertible(rows: &[&Row], header: &str) -> bool {
    rows.iter()
        .filter_map(|row| row.get(header))
        .all(|value| match value {
            Value::Null | Value::Number(_) => true,
            Value::Text(s) => parse_finite_number(s).is_some(),
        })
}

/// Headers whose columns pass [`column_is_convertible`] over `rows`.
pub(crate) fn convertible_columns<'h>(headers: &'h [String], rows: &[&Row]) -> HashSet<&'h str> {
    headers
        .iter()
        .filter(|header| column_is_convertible(rows, header))
        .map(String::as_str)
        .collect()
}
