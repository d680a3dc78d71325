//! The `Pipeline` struct and its builder.
//!
//! A pipeline sequences Parser, Cleaner and Summarizer for one upload.

use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::parser::parse_file;
use crate::summarizer::Summarizer;
use crate::types::{Dataset, DatasetSummary};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// Result of one pipeline run.
///
/// Field names serialize in camelCase for the web host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub cleaned_data: Dataset,
    pub summary: String,
}

impl PipelineOutput {
    /// True when no usable rows survived cleaning.
    ///
    /// This is a valid outcome, not an error; `summary` then holds the fixed
    /// empty-dataset message.
    pub fn is_empty(&self) -> bool {
        self.cleaned_data.is_empty()
    }
}

/// The ingestion pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_insight::{Pipeline, PipelineConfig};
/// use sheet_insight::config::DedupMode;
///
/// let output = Pipeline::builder()
///     .config(PipelineConfig::builder().dedup_mode(DedupMode::KeyAware).build()?)
///     .build()?
///     .process("sales.csv", &bytes)?;
///
/// println!("{}", output.summary);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    cleaner: DataCleaner,
    summarizer: Summarizer,
}

// A host may run the pipeline in a background task
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse, clean and summarize one uploaded file.
    ///
    /// Parse errors are returned unchanged. An empty cleaned dataset is
    /// returned as a normal output; check [`PipelineOutput::is_empty`].
    pub fn process(&self, name: &str, content: &[u8]) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        info!("Processing '{}' ({} bytes)", name, content.len());

        let dataset = match parse_file(name, content) {
            Ok(dataset) => dataset,
            Err(e) => {
                error!("Failed to parse '{}': {}", name, e);
                return Err(e);
            }
        };

        let output = self.process_dataset(&dataset);
        info!(
            "Finished '{}' in {}ms: {} rows kept",
            name,
            start_time.elapsed().as_millis(),
            output.cleaned_data.len()
        );
        Ok(output)
    }

    /// Clean and summarize an already parsed dataset.
    pub fn process_dataset(&self, dataset: &Dataset) -> PipelineOutput {
        let cleaned_data = self.cleaner.clean(dataset);
        let summary = self.summarizer.report(&cleaned_data);
        PipelineOutput {
            cleaned_data,
            summary,
        }
    }

    /// Structured summary of a cleaned dataset, for JSON output and charting.
    pub fn summarize(&self, cleaned: &Dataset) -> DatasetSummary {
        self.summarizer.summarize(cleaned)
    }

    /// Read a file from disk and process it. The file name drives format
    /// detection.
    pub fn process_path(&self, path: impl AsRef<Path>) -> Result<PipelineOutput> {
        let path = path.as_ref();
        let content =
            std::fs::read(path).context(format!("Failed to read '{}'", path.display()))?;
        self.process(&file_name(path), &content)
    }

    /// Async variant of [`Pipeline::process_path`]. Only the read is awaited;
    /// the stages run synchronously once the bytes are in memory.
    #[cfg(feature = "async")]
    pub async fn process_path_async(&self, path: impl AsRef<Path>) -> Result<PipelineOutput> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .context(format!("Failed to read '{}'", path.display()))?;
        self.process(&file_name(path), &content)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Builder for creating a configured [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            cleaner: DataCleaner::new(config.cleaning),
            summarizer: Summarizer::new(config.summary),
        })
    }
}
