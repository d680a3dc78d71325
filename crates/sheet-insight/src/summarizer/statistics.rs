//! Per-column statistics for the summary.

use super::histogram::histogram;
use crate::types::{CategoricalStats, NumericStats, Value, ValueCount};
use polars::prelude::*;
use std::collections::HashMap;

/// Compute descriptive statistics over a numeric column's values.
///
/// Returns `None` for an empty slice. Sum, mean, min and max are polars
/// aggregations; the median is read off the sorted values.
pub(crate) fn numeric_stats(name: &str, values: &[f64], bins: usize) -> Option<NumericStats> {
    if values.is_empty() {
        return None;
    }

    let ca = Float64Chunked::from_slice(name.into(), values);
    let sum = ca.sum().unwrap_or(0.0);
    let mean = ca.mean().unwrap_or(0.0);
    let min = ca.min().unwrap_or(0.0);
    let max = ca.max().unwrap_or(0.0);

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(NumericStats {
        count: values.len(),
        sum,
        mean,
        median: median_sorted(&sorted),
        min,
        max,
        histogram: histogram(&sorted, bins),
    })
}

/// Median of ascending-sorted values: the middle element for odd counts,
/// the average of the two middle elements for even counts.
pub(crate) fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Count distinct string forms and keep the `top` most frequent.
///
/// Ties keep the order in which values were first seen.
pub(crate) fn categorical_stats(values: &[&Value], top: usize) -> CategoricalStats {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for value in values.iter().filter(|v| !v.is_null()) {
        let key = value.to_string();
        match index.get(&key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push(ValueCount {
                    value: key,
                    count: 1,
                });
            }
        }
    }

    let unique_count = counts.len();
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top);

    CategoricalStats {
        unique_count,
        top_values: counts,
    }
}
