// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Olfactory classification pipeline
//!
//! Turns recorded sensor activations into odor predictions:
//! - **Data**: headerless CSV tables, labels from the concentration argmax
//! - **Preprocessing**: optional spike encoding, per-column standardization
//! - **Classifier**: one-vs-rest smartcore SVM with stratified grid search
//! - **Reporting**: confusion matrix and per-class precision / recall / F1
//!
//! ## Usage
//!
//! ```rust,no_run
//! use olfactory_config::OlfactoryConfig;
//! use olfactory_pipeline::{run_experiment, CsvDataSource};
//!
//! let config = OlfactoryConfig::default();
//! let outcome = run_experiment(&config, &CsvDataSource::default())?;
//! println!("{}", outcome.report);
//! # Ok::<(), olfactory_pipeline::PipelineError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod classifier;
pub mod data;
pub mod error;
pub mod report;
pub mod runner;
pub mod search;
pub mod standardize;

pub use classifier::{Classifier, Kernel, KernelSvm, SvmParams};
pub use data::{labels_from_concentration, read_matrix, CsvDataSource, DataSource, ExperimentData};
pub use error::{PipelineError, Result};
pub use report::{accuracy, ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use runner::{encode_features, run_experiment, ExperimentOutcome};
pub use search::{parameter_grid, stratified_k_fold, CandidateScore, FoldSplit, GridSearch, SearchOutcome};
pub use standardize::Standardizer;
