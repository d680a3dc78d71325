//! Configuration types for the ingestion pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults use the permissive cleaning behavior; the stricter modes
//! are opt-in.

use serde::{Deserialize, Serialize};

/// How two rows are compared during deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DedupMode {
    /// Compare the sorted multiset of cell values, ignoring which column each
    /// value sits in. Rows holding the same values under permuted columns are
    /// treated as duplicates.
    #[default]
    ValueMultiset,
    /// Compare cell values column by column, in header order.
    KeyAware,
}

/// How numeric-looking strings are converted to numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoercionMode {
    /// Convert every numeric-looking cell independently. A column can end up
    /// holding both numbers and strings.
    #[default]
    PerCell,
    /// Convert a column only when every present value in it is numeric-looking.
    PerColumn,
}

/// Options for the cleaning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CleaningConfig {
    pub dedup_mode: DedupMode,
    pub coercion_mode: CoercionMode,
}

/// Options for the summarizing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Number of most frequent values listed for a categorical column.
    /// Default: 5
    pub top_values: usize,

    /// Number of equal-width bins in a numeric column's histogram.
    /// Default: 10
    pub histogram_bins: usize,

    /// Decimal places used for the mean in the text report.
    /// Default: 2
    pub mean_decimals: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_values: 5,
            histogram_bins: 10,
            mean_decimals: 2,
        }
    }
}

/// Configuration for the whole pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_insight::config::{DedupMode, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .dedup_mode(DedupMode::KeyAware)
///     .top_values(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    pub cleaning: CleaningConfig,
    pub summary: SummaryConfig,
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.summary.top_values == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "top_values".to_string(),
                value: self.summary.top_values,
            });
        }

        if self.summary.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "histogram_bins".to_string(),
                value: self.summary.histogram_bins,
            });
        }

        if self.summary.mean_decimals > MAX_MEAN_DECIMALS {
            return Err(ConfigValidationError::InvalidDecimals(
                self.summary.mean_decimals,
            ));
        }

        Ok(())
    }
}

const MAX_MEAN_DECIMALS: usize = 10;

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid mean decimals: {0} (must be at most 10)")]
    InvalidDecimals(usize),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    dedup_mode: Option<DedupMode>,
    coercion_mode: Option<CoercionMode>,
    top_values: Option<usize>,
    histogram_bins: Option<usize>,
    mean_decimals: Option<usize>,
}

impl PipelineConfigBuilder {
    /// Set the deduplication mode.
    pub fn dedup_mode(mut self, mode: DedupMode) -> Self {
        self.dedup_mode = Some(mode);
        self
    }

    /// Set the numeric coercion mode.
    pub fn coercion_mode(mut self, mode: CoercionMode) -> Self {
        self.coercion_mode = Some(mode);
        self
    }

    /// Set how many of the most frequent values a categorical summary lists.
    pub fn top_values(mut self, n: usize) -> Self {
        self.top_values = Some(n);
        self
    }

    /// Set the number of histogram bins for numeric columns.
    pub fn histogram_bins(mut self, n: usize) -> Self {
        self.histogram_bins = Some(n);
        self
    }

    /// Set the number of decimal places shown for the mean.
    pub fn mean_decimals(mut self, n: usize) -> Self {
        self.mean_decimals = Some(n);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = SummaryConfig::default();
        let config = PipelineConfig {
            cleaning: CleaningConfig {
                dedup_mode: self.dedup_mode.unwrap_or_default(),
                coercion_mode: self.coercion_mode.unwrap_or_default(),
            },
            summary: SummaryConfig {
                top_values: self.top_values.unwrap_or(defaults.top_values),
                histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
                mean_decimals: self.mean_decimals.unwrap_or(defaults.mean_decimals),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
