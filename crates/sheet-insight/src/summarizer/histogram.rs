//! Equal-width histogram for numeric columns.

use crate::types::HistogramBin;

const EPSILON: f64 = 1e-10;

/// Build `num_bins` equal-width bins spanning the range of `values`.
///
/// The last bin's right edge is the maximum and includes it. A constant
/// sample collapses to one bin holding every value, as does a range too wide
/// to measure in `f64`. An empty sample yields no bins. `num_bins` of zero is
/// treated as one.
pub fn histogram(values: &[f64], num_bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let single = || {
        vec![HistogramBin {
            left: min,
            right: max,
            count: sorted.len(),
        }]
    };

    if (max - min).abs() < EPSILON {
        return single();
    }

    let num_bins = num_bins.max(1);
    let width = (max - min) / num_bins as f64;
    if !width.is_finite() {
        return single();
    }

    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| HistogramBin {
            left: min + i as f64 * width,
            right: if i == num_bins - 1 {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    // Single pass over sorted data
    let mut current = 0;
    for &value in &sorted {
        while current < num_bins - 1 && value >= bins[current].right {
            current += 1;
        }
        bins[current].count += 1;
    }

    bins
}
