//! Summary generation for cleaned datasets.
//!
//! This module turns a cleaned [`Dataset`] into:
//! - a structured [`DatasetSummary`] (for JSON output and charting)
//! - a plain-text report safe to embed in a prompt
//!
//! Columns are classified on every call from the values they hold; nothing
//! is cached on the dataset.

mod histogram;
mod report;
mod statistics;

use crate::config::SummaryConfig;
use crate::error::{InsightError, Result};
use crate::types::{ColumnKind, ColumnStats, ColumnSummary, Dataset, DatasetSummary};
use tracing::debug;

pub use histogram::histogram;
use statistics::{categorical_stats, numeric_stats};

/// Report text for a dataset with no rows left after cleaning.
pub const EMPTY_DATASET_MESSAGE: &str =
    "The dataset is empty after cleaning; no usable data is available for analysis.";

/// Generate the text report with the default configuration.
pub fn generate_summary(dataset: &Dataset) -> String {
    Summarizer::default().report(dataset)
}

/// Classify a column: numeric iff every present value is a number.
pub fn classify_column(dataset: &Dataset, header: &str) -> ColumnKind {
    dataset.column_kind(header)
}

/// Numeric columns that hold at least one value, in header order.
///
/// Fails with [`InsightError::NoNumericColumns`] when there are none, since a
/// chart needs at least one numeric axis.
pub fn numeric_columns(dataset: &Dataset) -> Result<Vec<String>> {
    let columns: Vec<String> = dataset
        .headers
        .iter()
        .filter(|header| dataset.column_kind(header) == ColumnKind::Numeric)
        .filter(|header| dataset.column_values(header).iter().any(|v| v.is_number()))
        .cloned()
        .collect();

    if columns.is_empty() {
        return Err(InsightError::NoNumericColumns);
    }
    Ok(columns)
}

/// Summary generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summarizer {
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// Compute the structured summary, one entry per column in header order.
    pub fn summarize(&self, dataset: &Dataset) -> DatasetSummary {
        let column_summaries = dataset
            .headers
            .iter()
            .map(|header| self.summarize_column(dataset, header))
            .collect();

        DatasetSummary {
            row_count: dataset.len(),
            column_count: dataset.width(),
            columns: dataset.headers.clone(),
            column_summaries,
        }
    }

    /// Render the text report.
    pub fn report(&self, dataset: &Dataset) -> String {
        if dataset.is_empty() {
            debug!("Dataset is empty; returning fixed message");
            return EMPTY_DATASET_MESSAGE.to_string();
        }
        report::render(&self.summarize(dataset), &self.config)
    }

    fn summarize_column(&self, dataset: &Dataset, header: &str) -> ColumnSummary {
        let values = dataset.column_values(header);

        let stats = match dataset.column_kind(header) {
            ColumnKind::Numeric => {
                let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
                ColumnStats::Numeric(numeric_stats(
                    header,
                    &numbers,
                    self.config.histogram_bins,
                ))
            }
            ColumnKind::Categorical => {
                ColumnStats::Categorical(categorical_stats(&values, self.config.top_values))
            }
        };

        debug!("Summarized column '{}' as {}", header, stats.kind());
        ColumnSummary {
            name: header.to_string(),
            stats,
        }
    }
}
