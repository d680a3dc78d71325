//! Spreadsheet Ingestion Library
//!
//! Turns an uploaded spreadsheet or delimited-text file into a cleaned dataset
//! and a plain-text statistical summary.
//!
//! # Overview
//!
//! The work happens in three stages, always in this order:
//!
//! - **Parser**: CSV/TSV/TXT via `csv`, XLSX/XLSM/XLSB/XLS/ODS via `calamine`
//! - **Cleaner**: header trimming, duplicate removal, incomplete-row removal,
//!   numeric coercion
//! - **Summarizer**: per-column numeric or categorical statistics rendered as text
//!
//! Only parsing can fail. A cleaned dataset with no rows is a normal outcome
//! reported through [`PipelineOutput::is_empty`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sheet_insight::parse_and_clean_file;
//!
//! let bytes = std::fs::read("sales.csv")?;
//! let output = parse_and_clean_file("sales.csv", &bytes)?;
//!
//! if output.is_empty() {
//!     println!("No usable data");
//! }
//! println!("{}", output.summary);
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to opt into the stricter cleaning modes or tune the
//! summary:
//!
//! ```rust,ignore
//! use sheet_insight::config::*;
//! use sheet_insight::Pipeline;
//!
//! let config = PipelineConfig::builder()
//!     .dedup_mode(DedupMode::KeyAware)          // Compare cells column by column
//!     .coercion_mode(CoercionMode::PerColumn)   // Only convert fully numeric columns
//!     .top_values(10)
//!     .build()?;
//!
//! let output = Pipeline::builder().config(config).build()?.process("sales.csv", &bytes)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod sample;
pub mod summarizer;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, clean_data};
pub use config::{
    CleaningConfig, CoercionMode, ConfigValidationError, DedupMode, PipelineConfig,
    PipelineConfigBuilder, SummaryConfig,
};
pub use error::{InsightError, Result as InsightResult, ResultExt};
pub use parser::{FileFormat, parse_file};
#[cfg(feature = "async")]
pub use pipeline::parse_and_clean_path_async;
pub use pipeline::{
    Pipeline, PipelineBuilder, PipelineOutput, parse_and_clean_file, parse_and_clean_path,
};
pub use summarizer::{
    EMPTY_DATASET_MESSAGE, Summarizer, classify_column, generate_summary, histogram,
    numeric_columns,
};
pub use types::{
    CategoricalStats, ColumnKind, ColumnStats, ColumnSummary, Dataset, DatasetSummary,
    HistogramBin, NumericStats, Row, Value, ValueCount,
};
