//! Plain-text rendering of a [`DatasetSummary`].

use super::EMPTY_DATASET_MESSAGE;
use crate::config::SummaryConfig;
use crate::types::{ColumnStats, ColumnSummary, DatasetSummary, format_number};
use std::fmt::Write;

/// Render the summary as the text report.
pub(crate) fn render(summary: &DatasetSummary, config: &SummaryConfig) -> String {
    if summary.row_count == 0 {
        return EMPTY_DATASET_MESSAGE.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Dataset Summary:");
    let _ = writeln!(out, "- Total rows: {}", summary.row_count);
    let _ = writeln!(out, "- Total columns: {}", summary.column_count);
    let _ = writeln!(out, "- Columns: {}", summary.columns.join(", "));
    let _ = writeln!(out);
    let _ = write!(out, "Column Statistics:");

    for column in &summary.column_summaries {
        out.push_str("\n\n");
        render_column(&mut out, column, config);
    }

    out
}

fn render_column(out: &mut String, column: &ColumnSummary, config: &SummaryConfig) {
    let _ = writeln!(out, "{} ({}):", column.name, column.stats.kind());

    match &column.stats {
        ColumnStats::Numeric(Some(stats)) => {
            let _ = writeln!(out, "  - Sum: {}", format_number(stats.sum));
            let _ = writeln!(out, "  - Mean: {:.*}", config.mean_decimals, stats.mean);
            let _ = writeln!(out, "  - Median: {}", format_number(stats.median));
            let _ = writeln!(out, "  - Min: {}", format_number(stats.min));
            let _ = write!(out, "  - Max: {}", format_number(stats.max));
        }
        ColumnStats::Numeric(None) => {
            let _ = write!(out, "  - No numeric values");
        }
        ColumnStats::Categorical(stats) => {
            let top: Vec<String> = stats.top_values.iter().map(|v| v.to_string()).collect();
            let _ = writeln!(out, "  - Unique values: {}", stats.unique_count);
            let _ = write!(out, "  - Top values: {}", top.join(", "));
        }
    }
}
