// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pipeline error types

use std::path::PathBuf;

use olfactory_config::ConfigError;
use olfactory_encoding::EncodingError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed input in {origin}: {reason}")]
    MalformedInput { origin: String, reason: String },

    #[error("Shape mismatch ({context}): expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Classifier used before fit")]
    NotFitted,

    #[error("Classifier failed: {0}")]
    Classifier(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PipelineError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        PipelineError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
