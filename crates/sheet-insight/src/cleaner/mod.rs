//! Data cleaning module for raw datasets.
//!
//! This module applies four steps, always in this order:
//! 1. Trimming column names (collisions get `_1`, `_2`, ... suffixes)
//! 2. Removing duplicate rows (first occurrence wins)
//! 3. Dropping every row with a missing or blank cell
//! 4. Converting numeric-looking strings to numbers
//!
//! Each step takes a dataset and returns a new one. Cleaning never fails;
//! an empty result means the upload held no usable data.

mod converters;
mod dedup;

use crate::config::{CleaningConfig, CoercionMode};
use crate::types::{Dataset, Row};
use crate::utils::unique_name;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use converters::{coerce_value, convertible_columns};
use dedup::{CellKey, row_key};

/// Clean a dataset with the default configuration.
pub fn clean_data(dataset: &Dataset) -> Dataset {
    DataCleaner::default().clean(dataset)
}

/// Data cleaner for the four-step cleaning pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner {
    config: CleaningConfig,
}

impl DataCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run all cleaning steps in order.
    pub fn clean(&self, dataset: &Dataset) -> Dataset {
        let rows_before = dataset.len();

        let normalized = self.normalize_headers(dataset);
        let deduped = self.remove_duplicates(&normalized);
        let complete = self.drop_incomplete_rows(&deduped);
        let cleaned = self.coerce_numbers(&complete);

        info!(
            "Cleaned dataset: {} -> {} rows, {} columns",
            rows_before,
            cleaned.len(),
            cleaned.width()
        );
        if cleaned.is_empty() {
            warn!("No usable rows left after cleaning");
        }

        cleaned
    }

    /// Trim whitespace from every column name.
    ///
    /// A trimmed name that is already taken gets the first free `_N` suffix.
    /// Rows are rebuilt with the new names and keep only header columns.
    pub fn normalize_headers(&self, dataset: &Dataset) -> Dataset {
        let mut taken: HashSet<String> = HashSet::new();
        let mut renames: Vec<(&str, String)> = Vec::with_capacity(dataset.width());

        for header in &dataset.headers {
            let trimmed = header.trim();
            let name = unique_name(trimmed, &taken);
            if name != trimmed {
                debug!("Column '{}' collides after trimming; renamed to '{}'", header, name);
            }
            taken.insert(name.clone());
            renames.push((header.as_str(), name));
        }

        let rows = dataset
            .rows
            .iter()
            .map(|row| {
                renames
                    .iter()
                    .filter_map(|(old, new)| row.get(*old).map(|v| (new.clone(), v.clone())))
                    .collect::<Row>()
            })
            .collect();

        let headers = renames.into_iter().map(|(_, new)| new).collect();
        Dataset::new(headers, rows)
    }

    /// Remove rows whose key matches an earlier row.
    ///
    /// Cells are compared in the form coercion will give them, so `" 1 "`
    /// and `1` are equal. With the default [`crate::config::DedupMode::ValueMultiset`]
    /// the comparison ignores which column a value sits in.
    pub fn remove_duplicates(&self, dataset: &Dataset) -> Dataset {
        let rows: Vec<Row> = self
            .surviving_rows(dataset)
            .into_iter()
            .map(|index| dataset.rows[index].clone())
            .collect();

        let removed = dataset.len() - rows.len();
        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }

        Dataset::new(dataset.headers.clone(), rows)
    }

    /// Indices of the rows kept by deduplication.
    ///
    /// Under `PerColumn` the columns compared as numbers must be the ones
    /// `coerce_numbers` converts once duplicates and incomplete rows are gone.
    /// Removing rows can only make more columns convertible, so dedup repeats
    /// over the survivors until that set stops growing.
    fn surviving_rows(&self, dataset: &Dataset) -> Vec<usize> {
        let all: Vec<usize> = (0..dataset.len()).collect();
        if self.config.coercion_mode == CoercionMode::PerCell {
            let coerced: HashSet<&str> = dataset.headers.iter().map(String::as_str).collect();
            return self.first_occurrences(dataset, &all, &coerced);
        }

        let mut kept = all;
        let mut coerced = complete_convertible(dataset, &kept);
        loop {
            kept = self.first_occurrences(dataset, &kept, &coerced);
            let next = complete_convertible(dataset, &kept);
            if next == coerced {
                return kept;
            }
            debug!("{} columns convertible after dedup, repeating", next.len());
            coerced = next;
        }
    }

    fn first_occurrences(
        &self,
        dataset: &Dataset,
        candidates: &[usize],
        coerced: &HashSet<&str>,
    ) -> Vec<usize> {
        let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(candidates.len());
        let mode = self.config.dedup_mode;

        candidates
            .iter()
            .copied()
            .filter(|&index| {
                seen.insert(row_key(&dataset.rows[index], &dataset.headers, mode, coerced))
            })
            .collect()
    }

    /// Drop every row with a null, absent, or blank cell in any header column.
    pub fn drop_incomplete_rows(&self, dataset: &Dataset) -> Dataset {
        let rows: Vec<Row> = dataset
            .rows
            .iter()
            .filter(|row| is_complete(row, &dataset.headers))
            .cloned()
            .collect();

        let removed = dataset.len() - rows.len();
        if removed > 0 {
            debug!("Removed {} rows with missing values", removed);
        }

        Dataset::new(dataset.headers.clone(), rows)
    }

    /// Replace numeric-looking strings with numbers.
    pub fn coerce_numbers(&self, dataset: &Dataset) -> Dataset {
        let convertible: HashSet<&str> = match self.config.coercion_mode {
            CoercionMode::PerCell => dataset.headers.iter().map(String::as_str).collect(),
            CoercionMode::PerColumn => {
                let rows: Vec<&Row> = dataset.rows.iter().collect();
                convertible_columns(&dataset.headers, &rows)
            }
        };

        if self.config.coercion_mode == CoercionMode::PerColumn {
            debug!(
                "{} of {} columns eligible for numeric conversion",
                convertible.len(),
                dataset.width()
            );
        }

        let rows = dataset
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(key, value)| {
                        let value = if convertible.contains(key.as_str()) {
                            coerce_value(value)
                        } else {
                            value.clone()
                        };
                        (key.clone(), value)
                    })
                    .collect::<Row>()
            })
            .collect();

        Dataset::new(dataset.headers.clone(), rows)
    }
}

/// Convertible columns over the complete rows among `indices`.
fn complete_convertible<'a>(dataset: &'a Dataset, indices: &[usize]) -> HashSet<&'a str> {
    let complete: Vec<&Row> = indices
        .iter()
        .map(|&index| &dataset.rows[index])
        .filter(|row| is_complete(row, &dataset.headers))
        .collect();
    convertible_columns(&dataset.headers, &complete)
}

fn is_complete(row: &Row, headers: &[String]) -> bool {
    headers
        .iter()
        .all(|header| row.get(header).is_some_and(|v| !v.is_missing()))
}
