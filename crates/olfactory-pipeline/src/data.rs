// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Dataset loading
//!
//! Concentration and activation recordings are headerless comma-separated
//! tables of floats, one sample per row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array2, ArrayView2};
use olfactory_config::DatasetPaths;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// Source of numeric tables
pub trait DataSource {
    fn load_matrix(&self, path: &Path) -> Result<Array2<f64>>;
}

/// Delimited text files on disk
#[derive(Debug, Clone, Copy)]
pub struct CsvDataSource {
    delimiter: u8,
}

impl Default for CsvDataSource {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDataSource {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl DataSource for CsvDataSource {
    fn load_matrix(&self, path: &Path) -> Result<Array2<f64>> {
        let file = File::open(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let matrix = read_matrix(file, self.delimiter, &path.display().to_string()).map_err(
            |err| match err {
                PipelineError::Csv { source, .. } => PipelineError::Csv {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            },
        )?;
        debug!(path = %path.display(), rows = matrix.nrows(), cols = matrix.ncols(), "Loaded matrix");
        Ok(matrix)
    }
}

/// Parse a rectangular table of floats
///
/// `origin` names the input in error messages. Ragged rows, non-numeric
/// cells and empty tables are rejected.
pub fn read_matrix<R: Read>(reader: R, delimiter: u8, origin: &str) -> Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let malformed = |reason: String| PipelineError::MalformedInput {
        origin: origin.to_string(),
        reason,
    };

    let mut values = Vec::new();
    let mut width = None;
    let mut rows = 0;

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| PipelineError::Csv {
            path: origin.into(),
            source,
        })?;

        match width {
            None => width = Some(record.len()),
            Some(expected) if expected != record.len() => {
                return Err(malformed(format!(
                    "row {} has {} columns, expected {}",
                    row,
                    record.len(),
                    expected
                )));
            }
            Some(_) => {}
        }

        for (column, cell) in record.iter().enumerate() {
            let value = cell.parse::<f64>().map_err(|_| {
                malformed(format!("row {}, column {}: '{}' is not a number", row, column, cell))
            })?;
            values.push(value);
        }
        rows += 1;
    }

    let cols = width.unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(malformed("table is empty".to_string()));
    }

    Array2::from_shape_vec((rows, cols), values)
        .map_err(|err| malformed(format!("cannot shape {}x{} table: {}", rows, cols, err)))
}

/// Class of each sample: index of the largest concentration (first wins)
pub fn labels_from_concentration(concentration: ArrayView2<f64>) -> Vec<usize> {
    concentration
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, best_value), (index, &value)| {
                    if value > best_value {
                        (index, value)
                    } else {
                        (best, best_value)
                    }
                })
                .0
        })
        .collect()
}

/// Labeled train/test split of one experiment
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentData {
    pub train_features: Array2<f64>,
    pub train_labels: Vec<usize>,
    pub test_features: Array2<f64>,
    pub test_labels: Vec<usize>,
}

impl ExperimentData {
    /// Load all four tables and derive labels
    pub fn load(source: &dyn DataSource, paths: &DatasetPaths) -> Result<Self> {
        let train_concentration = source.load_matrix(&paths.train_concentration)?;
        let train_features = source.load_matrix(&paths.train_activation)?;
        let test_concentration = source.load_matrix(&paths.test_concentration)?;
        let test_features = source.load_matrix(&paths.test_activation)?;

        Self::from_matrices(
            train_concentration.view(),
            train_features,
            test_concentration.view(),
            test_features,
        )
    }

    pub fn from_matrices(
        train_concentration: ArrayView2<f64>,
        train_features: Array2<f64>,
        test_concentration: ArrayView2<f64>,
        test_features: Array2<f64>,
    ) -> Result<Self> {
        if train_concentration.nrows() != train_features.nrows() {
            return Err(PipelineError::shape(
                "train activation rows",
                train_concentration.nrows(),
                train_features.nrows(),
            ));
        }
        if test_concentration.nrows() != test_features.nrows() {
            return Err(PipelineError::shape(
                "test activation rows",
                test_concentration.nrows(),
                test_features.nrows(),
            ));
        }
        if train_features.ncols() != test_features.ncols() {
            return Err(PipelineError::shape(
                "test activation channels",
                train_features.ncols(),
                test_features.ncols(),
            ));
        }

        let data = Self {
            train_labels: labels_from_concentration(train_concentration),
            test_labels: labels_from_concentration(test_concentration),
            train_features,
            test_features,
        };
        info!(
            train_samples = data.train_labels.len(),
            test_samples = data.test_labels.len(),
            channels = data.train_features.ncols(),
            "Dataset loaded"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_read_matrix_parses_rows() {
        let text = "0.1, 0.2,0.3\n1,2,3\n\n";
        let matrix = read_matrix(text.as_bytes(), b',', "inline").unwrap();
        assert_eq!(matrix, array![[0.1, 0.2, 0.3], [1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_read_matrix_rejects_ragged_rows() {
        let err = read_matrix("1,2\n3\n".as_bytes(), b',', "inline").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_read_matrix_rejects_text_cells() {
        let err = read_matrix("1,odor\n".as_bytes(), b',', "inline").unwrap_err();
        assert!(err.to_string().contains("'odor'"));
    }

    #[test]
    fn test_read_matrix_rejects_empty_table() {
        assert!(matches!(
            read_matrix("".as_bytes(), b',', "inline"),
            Err(PipelineError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_csv_source_reads_file_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train_a.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "0.5;0.25").unwrap();
        writeln!(file, "0.75;1").unwrap();

        let source = CsvDataSource::with_delimiter(b';');
        let matrix = source.load_matrix(&path).unwrap();
        assert_eq!(matrix, array![[0.5, 0.25], [0.75, 1.0]]);

        let missing = source.load_matrix(&dir.path().join("absent.csv"));
        assert!(matches!(missing, Err(PipelineError::Io { .. })));
    }

    #[test]
    fn test_labels_take_first_maximum() {
        let concentration = array![[0.0, 3.0, 1.0, 0.0], [2.0, 2.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.5]];
        assert_eq!(labels_from_concentration(concentration.view()), vec![1, 0, 3]);
    }

    #[test]
    fn test_row_alignment_checked() {
        let result = ExperimentData::from_matrices(
            array![[1.0, 0.0]].view(),
            array![[0.1], [0.2]],
            array![[0.0, 1.0]].view(),
            array![[0.3]],
        );
        assert!(matches!(result, Err(PipelineError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_channel_count_checked() {
        let result = ExperimentData::from_matrices(
            array![[1.0, 0.0]].view(),
            array![[0.1, 0.2]],
            array![[0.0, 1.0]].view(),
            array![[0.3]],
        );
        assert!(matches!(result, Err(PipelineError::ShapeMismatch { expected: 2, actual: 1, .. })));
    }
}
