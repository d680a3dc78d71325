//! Integration tests for the ingestion pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline using small
//! in-memory files and the fixtures under `tests/fixtures`.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheet_insight::config::{CoercionMode, DedupMode};
use sheet_insight::utils::{is_numeric_string, parse_finite_number};
use sheet_insight::{
    CleaningConfig, ColumnKind, ColumnStats, DataCleaner, Dataset, EMPTY_DATASET_MESSAGE,
    Pipeline, PipelineConfig, Row, Value, clean_data, generate_summary, numeric_columns,
    parse_and_clean_file, parse_and_clean_path, parse_file,
};
use std::collections::HashSet;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> Vec<u8> {
    std::fs::read(fixtures_path().join(filename)).expect("Failed to read fixture")
}

fn column_strings(dataset: &Dataset, header: &str) -> Vec<String> {
    dataset
        .column_values(header)
        .iter()
        .map(|v| v.to_string())
        .collect()
}

fn pipeline_with(config: PipelineConfig) -> Pipeline {
    Pipeline::builder().config(config).build().unwrap()
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_trimmed_duplicates_collapse_to_one_row() {
    let output = parse_and_clean_file("data.csv", b"A, B\n 1 ,x\n1,x\n").unwrap();

    assert_eq!(output.cleaned_data.headers, vec!["A", "B"]);
    assert_eq!(output.cleaned_data.len(), 1);
    assert_eq!(output.cleaned_data.get(0, "A"), Some(&Value::Number(1.0)));
    assert_eq!(output.cleaned_data.get(0, "B"), Some(&Value::text("x")));
}

#[test]
fn test_blank_cell_empties_dataset() {
    let output = parse_and_clean_file("data.csv", b"A,B\n1,\n").unwrap();

    assert!(output.is_empty());
    assert_eq!(output.summary, EMPTY_DATASET_MESSAGE);
}

#[test]
fn test_numeric_column_summary() {
    let output = parse_and_clean_file("prices.csv", b"price\n10\n20\n30\n40\n").unwrap();

    assert!(output.summary.contains("price (numeric):"));
    assert!(output.summary.contains("Mean: 25.00"));
    assert!(output.summary.contains("Median: 25"));
    assert!(output.summary.contains("Min: 10"));
    assert!(output.summary.contains("Max: 40"));
}

#[test]
fn test_categorical_column_summary() {
    // Each row gets a distinct id so none of them are duplicates
    let csv = "id,region\n1,a\n2,a\n3,b\n4,c\n5,a\n6,b\n";
    let output = parse_and_clean_file("regions.csv", csv.as_bytes()).unwrap();

    assert_eq!(output.cleaned_data.len(), 6);
    assert!(output.summary.contains("region (categorical):"));
    assert!(output.summary.contains("Unique values: 3"));
    assert!(output.summary.contains("Top values: a (3 times)"));
}

// ============================================================================
// Fixture Tests
// ============================================================================

#[test]
fn test_sales_fixture_end_to_end() {
    let output = parse_and_clean_file("sales.csv", &load_fixture("sales.csv")).unwrap();
    let data = &output.cleaned_data;

    assert_eq!(data.headers, vec!["region", "product", "units", "price"]);
    // One duplicate and one row with a blank cell removed
    assert_eq!(data.len(), 4);
    assert_eq!(column_strings(data, "region"), vec!["north", "south", "west", "south"]);

    assert_eq!(data.column_kind("units"), ColumnKind::Numeric);
    // "n/a" keeps the price column categorical
    assert_eq!(data.column_kind("price"), ColumnKind::Categorical);
    assert_eq!(data.get(2, "price"), Some(&Value::Number(1.5)));

    assert!(output.summary.contains("- Total rows: 4"));
    assert!(output.summary.contains("- Columns: region, product, units, price"));
    assert!(output.summary.contains("  - Sum: 42\n"));
    assert!(output.summary.contains("  - Mean: 10.50\n"));
    assert!(output.summary.contains("  - Median: 8.5\n"));
    assert!(output.summary.contains("Top values: south (2 times), north (1 times), west (1 times)"));
    assert!(output.summary.contains("Top values: widget (2 times), gadget (1 times), gizmo (1 times)"));
}

#[test]
fn test_tsv_fixture_from_path() {
    let output = parse_and_clean_path(fixtures_path().join("cities.tsv")).unwrap();

    assert_eq!(output.cleaned_data.headers, vec!["city", "population"]);
    assert_eq!(output.cleaned_data.len(), 2);
    assert_eq!(
        output.cleaned_data.get(1, "population"),
        Some(&Value::Number(2_800_000.0))
    );
}

#[test]
fn test_xlsx_fixture_reads_first_sheet() {
    let data = parse_file("regions.xlsx", &load_fixture("regions.xlsx")).unwrap();

    // Header kept verbatim; the "Notes" sheet is never read
    assert_eq!(data.headers, vec![" Region ", "units"]);
    // Row 3 of the sheet is blank
    assert_eq!(data.len(), 3);
    assert_eq!(column_strings(&data, " Region "), vec!["north", "south", "east"]);

    assert_eq!(data.get(0, "units"), Some(&Value::Number(10.0)));
    assert_eq!(data.get(1, "units"), Some(&Value::text("20")));
    assert_eq!(data.get(2, "units"), Some(&Value::Number(7.5)));
}

#[test]
fn test_xlsx_fixture_end_to_end() {
    let output = parse_and_clean_file("regions.xlsx", &load_fixture("regions.xlsx")).unwrap();
    let data = &output.cleaned_data;

    assert_eq!(data.headers, vec!["Region", "units"]);
    assert_eq!(data.len(), 3);
    assert_eq!(data.column_kind("units"), ColumnKind::Numeric);
    assert_eq!(data.get(1, "units"), Some(&Value::Number(20.0)));

    assert!(output.summary.contains("units (numeric):"));
    assert!(output.summary.contains("  - Sum: 37.5\n"));
    assert!(output.summary.contains("Region (categorical):"));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_path_matches_sync() {
    let path = fixtures_path().join("sales.csv");
    let sync_output = parse_and_clean_path(&path).unwrap();
    let async_output = sheet_insight::parse_and_clean_path_async(&path).await.unwrap();

    assert_eq!(sync_output, async_output);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_missing_file() {
    let err = sheet_insight::parse_and_clean_path_async("/no/such/file.csv")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
}

// ============================================================================
// Format and Error Tests
// ============================================================================

#[test]
fn test_unsupported_format() {
    let err = parse_and_clean_file("slides.pptx", b"whatever").unwrap_err();

    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("slides.pptx"));
}

#[test]
fn test_corrupt_spreadsheet_is_decode_error() {
    let err = parse_and_clean_file("book.xlsx", b"not a zip archive").unwrap_err();

    assert_eq!(err.error_code(), "DECODE_ERROR");
    assert!(err.is_parse_error());
}

#[test]
fn test_invalid_utf8_is_decode_error() {
    let err = parse_and_clean_file("data.csv", &[b'a', b'\n', 0xff, 0xfe, b'\n']).unwrap_err();
    assert_eq!(err.error_code(), "DECODE_ERROR");
}

#[test]
fn test_error_serializes_for_frontend() {
    let err = parse_and_clean_file("notes.docx", b"").unwrap_err();
    let json = serde_json::to_value(&err).unwrap();

    assert_eq!(json["code"], "UNSUPPORTED_FORMAT");
    assert!(json["message"].as_str().unwrap().contains("notes.docx"));
}

#[test]
fn test_txt_delimiter_is_sniffed() {
    let output = parse_and_clean_file("export.txt", b"name;score\nada;9\nbob;7\n").unwrap();

    assert_eq!(output.cleaned_data.headers, vec!["name", "score"]);
    assert_eq!(output.cleaned_data.get(0, "score"), Some(&Value::Number(9.0)));
}

#[test]
fn test_header_only_file() {
    let output = parse_and_clean_file("data.csv", b"a,b\n").unwrap();

    assert!(output.is_empty());
    assert_eq!(output.cleaned_data.headers, vec!["a", "b"]);
    assert_eq!(output.summary, EMPTY_DATASET_MESSAGE);
}

#[test]
fn test_empty_file() {
    let output = parse_and_clean_file("data.csv", b"").unwrap();
    assert!(output.is_empty());
}

#[test]
fn test_parser_keeps_raw_strings() {
    let raw = parse_file("data.csv", b" a ,b\n 1 ,2\n").unwrap();

    assert_eq!(raw.headers, vec![" a ", "b"]);
    assert_eq!(raw.get(0, " a "), Some(&Value::text(" 1 ")));
    assert_eq!(raw.get(0, "b"), Some(&Value::text("2")));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_default_dedup_merges_permuted_rows() {
    let output = parse_and_clean_file("data.csv", b"a,b\nx,y\ny,x\n").unwrap();
    assert_eq!(output.cleaned_data.len(), 1);
}

#[test]
fn test_key_aware_dedup_keeps_permuted_rows() {
    let pipeline = pipeline_with(
        PipelineConfig::builder()
            .dedup_mode(DedupMode::KeyAware)
            .build()
            .unwrap(),
    );
    let output = pipeline.process("data.csv", b"a,b\nx,y\ny,x\n").unwrap();
    assert_eq!(output.cleaned_data.len(), 2);
}

#[test]
fn test_per_cell_coercion_mixes_column() {
    let output = parse_and_clean_file("data.csv", b"id,region\n1,5\n2,north\n").unwrap();
    let data = &output.cleaned_data;

    assert_eq!(data.get(0, "region"), Some(&Value::Number(5.0)));
    assert_eq!(data.column_kind("region"), ColumnKind::Categorical);
    assert!(output.summary.contains("region (categorical):"));
}

#[test]
fn test_per_column_coercion_keeps_mixed_column_text() {
    let pipeline = pipeline_with(
        PipelineConfig::builder()
            .coercion_mode(CoercionMode::PerColumn)
            .build()
            .unwrap(),
    );
    let output = pipeline
        .process("data.csv", b"id,region\n1,5\n2,north\n")
        .unwrap();
    let data = &output.cleaned_data;

    assert_eq!(data.get(0, "region"), Some(&Value::text("5")));
    assert_eq!(data.get(0, "id"), Some(&Value::Number(1.0)));
}

#[test]
fn test_per_column_dedup_keeps_rows_that_differ_as_text() {
    let pipeline = pipeline_with(
        PipelineConfig::builder()
            .coercion_mode(CoercionMode::PerColumn)
            .build()
            .unwrap(),
    );
    let output = pipeline
        .process("data.csv", b"a,b\n5,x\n\" 5\",x\nnorth,y\n")
        .unwrap();

    assert_eq!(output.cleaned_data.len(), 3);
    assert_eq!(column_strings(&output.cleaned_data, "a"), vec!["5", " 5", "north"]);
}

#[test]
fn test_top_values_config() {
    let pipeline = pipeline_with(PipelineConfig::builder().top_values(1).build().unwrap());
    let output = pipeline
        .process("data.csv", b"id,c\n1,a\n2,a\n3,b\n")
        .unwrap();

    assert!(output.summary.ends_with("  - Top values: a (2 times)"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = PipelineConfig::builder().histogram_bins(0).build().unwrap_err();
    let err: sheet_insight::InsightError = err.into();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

// ============================================================================
// Collaborator Interface Tests
// ============================================================================

#[test]
fn test_numeric_columns_for_charting() {
    let output = parse_and_clean_file("sales.csv", &load_fixture("sales.csv")).unwrap();
    assert_eq!(numeric_columns(&output.cleaned_data).unwrap(), vec!["units"]);

    let text_only = parse_and_clean_file("t.csv", b"name\nada\n").unwrap();
    assert_eq!(
        numeric_columns(&text_only.cleaned_data).unwrap_err().error_code(),
        "NO_NUMERIC_COLUMNS"
    );
}

#[test]
fn test_structured_summary_histogram() {
    let pipeline = pipeline_with(PipelineConfig::builder().histogram_bins(2).build().unwrap());
    let output = pipeline
        .process("prices.csv", b"price\n10\n20\n30\n40\n")
        .unwrap();
    let summary = pipeline.summarize(&output.cleaned_data);

    match &summary.column_summaries[0].stats {
        ColumnStats::Numeric(Some(stats)) => {
            let counts: Vec<usize> = stats.histogram.iter().map(|b| b.count).collect();
            assert_eq!(counts, vec![2, 2]);
        }
        other => panic!("expected numeric stats, got {:?}", other),
    }
}

#[test]
fn test_cleaned_data_to_dataframe() {
    let output = parse_and_clean_file("sales.csv", &load_fixture("sales.csv")).unwrap();
    let df = output.cleaned_data.to_dataframe().unwrap();

    assert_eq!(df.shape(), (4, 4));
    assert_eq!(
        df.get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>(),
        vec!["region", "product", "units", "price"]
    );
}

#[test]
fn test_output_json_shape() {
    let output = parse_and_clean_file("data.csv", b"a,b\n1,x\n").unwrap();
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["cleanedData"]["headers"], serde_json::json!(["a", "b"]));
    assert_eq!(json["cleanedData"]["rows"][0]["b"], "x");
    assert!(json["summary"].as_str().unwrap().starts_with("Dataset Summary:"));
}

#[test]
fn test_generate_summary_on_raw_rows() {
    let rows: Vec<Row> = vec![
        [("n".to_string(), Value::Number(1.0))].into_iter().collect(),
        [("n".to_string(), Value::Number(3.0))].into_iter().collect(),
    ];
    let summary = generate_summary(&Dataset::from_rows(rows));
    assert!(summary.contains("  - Mean: 2.00"));
}

// ============================================================================
// Property Tests
// ============================================================================

fn cell() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        prop::sample::select(vec![
            "", " ", "1", " 1 ", "1.0", "2", "-0", "0", "x", " x", "north", "0x10", "1e2", "NaN",
        ])
        .prop_map(|s| Some(Value::text(s))),
        (-3i64..3).prop_map(|n| Some(Value::from(n))),
    ]
}

fn raw_dataset() -> impl Strategy<Value = Dataset> {
    prop::sample::subsequence(vec!["a", " a", "a ", "b", " b"], 1..4)
        .prop_flat_map(|headers| {
            let width = headers.len();
            (
                Just(headers),
                prop::collection::vec(prop::collection::vec(cell(), width), 0..10),
            )
        })
        .prop_map(|(headers, cells)| {
            let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
            let rows = cells
                .into_iter()
                .map(|row| {
                    headers
                        .iter()
                        .zip(row)
                        .filter_map(|(h, v)| v.map(|v| (h.clone(), v)))
                        .collect::<Row>()
                })
                .collect();
            Dataset::new(headers, rows)
        })
}

/// One row with every cell present and non-blank, so it always survives.
fn complete_row() -> impl Strategy<Value = Dataset> {
    let cell = prop_oneof![
        prop::sample::select(vec![
            "1", " 1 ", "1.0", "-0", "2.50", "0x10", "0b11", "1e2", "NaN", "x", " x", "north",
        ])
        .prop_map(|s| Value::text(s)),
        (-3i64..3).prop_map(Value::from),
    ];

    prop::collection::vec(cell, 3).prop_map(|cells| {
        let headers: Vec<String> = ["a", "b", "c"].iter().map(|h| h.to_string()).collect();
        let row: Row = headers.iter().cloned().zip(cells).collect();
        Dataset::new(headers, vec![row])
    })
}

fn per_column_cleaner() -> DataCleaner {
    DataCleaner::new(CleaningConfig {
        coercion_mode: CoercionMode::PerColumn,
        ..CleaningConfig::default()
    })
}

fn multiset_key(row: &Row) -> Vec<String> {
    let mut key: Vec<String> = row
        .values()
        .map(|v| match v {
            Value::Number(_) => format!("n:{}", v),
            other => format!("t:{}", other),
        })
        .collect();
    key.sort();
    key
}

proptest! {
    #[test]
    fn prop_cleaning_is_idempotent(ds in raw_dataset()) {
        let once = clean_data(&ds);
        let twice = clean_data(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_cleaned_rows_are_distinct(ds in raw_dataset()) {
        let cleaned = clean_data(&ds);
        let keys: HashSet<Vec<String>> = cleaned.rows.iter().map(multiset_key).collect();
        prop_assert_eq!(keys.len(), cleaned.len());
    }

    #[test]
    fn prop_cleaned_rows_are_complete(ds in raw_dataset()) {
        let cleaned = clean_data(&ds);
        for row in &cleaned.rows {
            prop_assert_eq!(row.len(), cleaned.width());
            for header in &cleaned.headers {
                let value = row.get(header);
                prop_assert!(value.is_some_and(|v| !v.is_missing()));
            }
        }
    }

    #[test]
    fn prop_no_numeric_strings_survive(ds in raw_dataset()) {
        let cleaned = clean_data(&ds);
        for value in cleaned.rows.iter().flat_map(|row| row.values()) {
            if let Value::Text(s) = value {
                prop_assert!(!is_numeric_string(s), "numeric string survived: {:?}", s);
            }
        }
    }

    #[test]
    fn prop_numeric_strings_become_their_value(ds in complete_row()) {
        let cleaned = clean_data(&ds);
        prop_assert_eq!(cleaned.len(), 1);

        for header in &ds.headers {
            let source = ds.get(0, header).cloned().unwrap_or_default();
            let expected = match &source {
                Value::Text(s) => parse_finite_number(s).map(Value::Number).unwrap_or(source.clone()),
                other => other.clone(),
            };
            prop_assert_eq!(cleaned.get(0, header), Some(&expected));
        }
    }

    #[test]
    fn prop_per_column_cleaning_is_idempotent(ds in raw_dataset()) {
        let cleaner = per_column_cleaner();
        let once = cleaner.clean(&ds);
        let twice = cleaner.clean(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_per_column_rows_are_distinct(ds in raw_dataset()) {
        let cleaned = per_column_cleaner().clean(&ds);
        let keys: HashSet<Vec<String>> = cleaned.rows.iter().map(multiset_key).collect();
        prop_assert_eq!(keys.len(), cleaned.len());
    }

    #[test]
    fn prop_headers_are_trimmed_and_unique(ds in raw_dataset()) {
        let cleaned = clean_data(&ds);
        let unique: HashSet<&String> = cleaned.headers.iter().collect();

        prop_assert_eq!(unique.len(), cleaned.width());
        prop_assert_eq!(cleaned.width(), ds.width());
        for header in &cleaned.headers {
            prop_assert_eq!(header.trim(), header.as_str());
        }
        prop_assert!(cleaned.len() <= ds.len());
    }

    #[test]
    fn prop_summary_never_panics(ds in raw_dataset()) {
        let summary = generate_summary(&clean_data(&ds));
        prop_assert!(!summary.is_empty());
    }
}
