//! Custom error types for the ingestion pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Only parsing
//! can fail in the core; cleaning and summarizing are total functions. An
//! empty cleaned dataset is not an error and is reported through
//! [`crate::PipelineOutput::is_empty`] instead.
//!
//! Errors are serializable so a web host can forward them to the frontend
//! for display.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the ingestion pipeline.
#[derive(Error, Debug)]
pub enum InsightError {
    /// File extension matches neither the delimited-text nor the spreadsheet family.
    #[error("Unsupported file format '{extension}' for '{name}' (expected CSV, TSV, TXT, XLSX, XLSM, XLSB, XLS or ODS)")]
    UnsupportedFormat { name: String, extension: String },

    /// The underlying decoder rejected the file content.
    #[error("Failed to decode {format} file: {reason}")]
    Decode { format: String, reason: String },

    /// No numeric column is available for charting.
    #[error("No numeric columns found in the dataset")]
    NoNumericColumns,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars rejected a DataFrame conversion.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InsightError>,
    },
}

impl InsightError {
    pub(crate) fn decode(format: impl Into<String>, reason: impl ToString) -> Self {
        InsightError::Decode {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        InsightError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::NoNumericColumns => "NO_NUMERIC_COLUMNS",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the parser (unsupported format or decode failure).
    pub fn is_parse_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat { .. } | Self::Decode { .. } => true,
            Self::WithContext { source, .. } => source.is_parse_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for InsightError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        InsightError::InvalidConfig(err.to_string())
    }
}

/// Serialize as `{ code, message }` for the frontend.
impl Serialize for InsightError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InsightError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, InsightError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightError::Io(e).with_context(context))
    }
}
