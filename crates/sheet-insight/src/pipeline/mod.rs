//! Pipeline module.
//!
//! This module provides the single entry point that runs Parser, Cleaner and
//! Summarizer over an uploaded file.

mod builder;

pub use builder::{Pipeline, PipelineBuilder, PipelineOutput};

use crate::error::Result;
use std::path::Path;

/// Parse, clean and summarize an uploaded file with the default configuration.
///
/// Parse errors propagate unchanged.
pub fn parse_and_clean_file(name: &str, content: &[u8]) -> Result<PipelineOutput> {
    Pipeline::default().process(name, content)
}

/// Read a file from disk and run the default pipeline over it.
pub fn parse_and_clean_path(path: impl AsRef<Path>) -> Result<PipelineOutput> {
    Pipeline::default().process_path(path)
}

/// Async variant of [`parse_and_clean_path`].
#[cfg(feature = "async")]
pub async fn parse_and_clean_path_async(path: impl AsRef<Path>) -> Result<PipelineOutput> {
    Pipeline::default().process_path_async(path).await
}
