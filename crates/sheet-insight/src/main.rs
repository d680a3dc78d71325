//! CLI entry point for the spreadsheet ingestion pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use sheet_insight::sample::sample_dataset;
use sheet_insight::{
    CoercionMode, DatasetSummary, DedupMode, Pipeline, PipelineConfig, PipelineOutput,
    numeric_columns,
};
use std::path::Path;
use tracing::{info, warn};

/// Exit status when no usable rows survive cleaning.
const EXIT_EMPTY_DATASET: i32 = 2;

/// CLI-compatible deduplication mode enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDedupMode {
    /// Compare the sorted cell values, ignoring column placement
    ValueMultiset,
    /// Compare cell values column by column
    KeyAware,
}

impl From<CliDedupMode> for DedupMode {
    fn from(cli: CliDedupMode) -> Self {
        match cli {
            CliDedupMode::ValueMultiset => DedupMode::ValueMultiset,
            CliDedupMode::KeyAware => DedupMode::KeyAware,
        }
    }
}

/// CLI-compatible numeric coercion mode enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCoercionMode {
    /// Convert every numeric-looking cell
    PerCell,
    /// Convert a column only when all its values are numeric-looking
    PerColumn,
}

impl From<CliCoercionMode> for CoercionMode {
    fn from(cli: CliCoercionMode) -> Self {
        match cli {
            CliCoercionMode::PerCell => CoercionMode::PerCell,
            CliCoercionMode::PerColumn => CoercionMode::PerColumn,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a spreadsheet and summarize its columns",
    long_about = "Parses a CSV, TSV, TXT, XLSX, XLSM, XLSB, XLS or ODS file, cleans it \
                  (trimmed headers, no duplicates, no incomplete rows, numbers coerced) \
                  and prints a statistical summary.\n\n\
                  EXAMPLES:\n  \
                  # Summarize a file\n  \
                  sheet-insight -i sales.csv\n\n  \
                  # Try the built-in sample\n  \
                  sheet-insight --sample\n\n  \
                  # Machine-readable output\n  \
                  sheet-insight -i sales.xlsx --json"
)]
struct Args {
    /// Path to the file to process
    #[arg(short, long, required_unless_present = "sample", conflicts_with = "sample")]
    input: Option<String>,

    /// Use the built-in demo dataset instead of a file
    #[arg(long)]
    sample: bool,

    /// How duplicate rows are detected
    #[arg(long, value_enum, default_value = "value-multiset")]
    dedup: CliDedupMode,

    /// How numeric-looking strings are converted
    #[arg(long, value_enum, default_value = "per-cell")]
    coercion: CliCoercionMode,

    /// Number of most frequent values listed per categorical column
    #[arg(long, default_value = "5")]
    top: usize,

    /// Number of histogram bins per numeric column (JSON output only)
    #[arg(long, default_value = "10")]
    bins: usize,

    /// Output JSON to stdout instead of the text report
    ///
    /// Disables all logs; only outputs the final JSON digest.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors in the log
    #[arg(short, long)]
    quiet: bool,
}

/// JSON digest printed by `--json`.
#[derive(Debug, Serialize)]
struct Digest<'a> {
    generated_at: String,
    source: &'a str,
    numeric_columns: Vec<String>,
    summary: DatasetSummary,
    summary_text: &'a str,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = PipelineConfig::builder()
        .dedup_mode(args.dedup.into())
        .coercion_mode(args.coercion.into())
        .top_values(args.top)
        .histogram_bins(args.bins)
        .build()?;

    let pipeline = Pipeline::builder().config(config).build()?;

    let (source, output) = match (&args.input, args.sample) {
        (_, true) => {
            info!("Using built-in sample dataset");
            ("sample", pipeline.process_dataset(&sample_dataset()))
        }
        (Some(input), false) => {
            if !Path::new(input).exists() {
                return Err(anyhow!("Input file not found: {}", input));
            }
            (input.as_str(), pipeline.process_path(input)?)
        }
        (None, false) => return Err(anyhow!("Either --input or --sample is required")),
    };

    if args.json {
        print_digest(&pipeline, source, &output)?;
    } else {
        println!("{}", output.summary);
    }

    if output.is_empty() {
        warn!("No usable data in {}", source);
        std::process::exit(EXIT_EMPTY_DATASET);
    }

    Ok(())
}

fn print_digest(pipeline: &Pipeline, source: &str, output: &PipelineOutput) -> Result<()> {
    let digest = Digest {
        generated_at: chrono::Local::now().to_rfc3339(),
        source,
        // No numeric columns renders as an empty list
        numeric_columns: numeric_columns(&output.cleaned_data).unwrap_or_default(),
        summary: pipeline.summarize(&output.cleaned_data),
        summary_text: &output.summary,
    };

    println!("{}", serde_json::to_string_pretty(&digest)?);
    Ok(())
}
