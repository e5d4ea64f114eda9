// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Olfactory - spike encoding and odor classification
//!
//! Encodes electronic-nose sensor activations as spike trains and classifies
//! odors with a kernel support vector machine.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! olfactory = "0.1"
//! ```
//!
//! ## Usage Examples
//!
//! ### Encoding only
//!
//! ```rust
//! use olfactory::prelude::*;
//! use olfactory::ndarray::array;
//!
//! let encoder = RsaEncoder::new(RsaConfig::default())?;
//! let counts = encoder.population_spike_counts(array![[0.5, 0.25]].view())?;
//! assert_eq!(counts.dim(), (1, 2));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Full experiment
//!
//! ```rust,no_run
//! use olfactory::prelude::*;
//!
//! let config = load_config(None, None)?;
//! let outcome = run_experiment(&config, &CsvDataSource::default())?;
//! println!("{}", outcome.report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: olfactory-config, olfactory-observability  │
//! │  (TOML + overrides, tracing setup)                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: olfactory-encoding                         │
//! │  (latency model, spike simulation, firing budget)       │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application: olfactory-pipeline, olfactory-svm         │
//! │  (CSV data, standardization, SVM, grid search, report)  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use ndarray;

pub use olfactory_config as config;
pub use olfactory_encoding as encoding;
pub use olfactory_observability as observability;
pub use olfactory_pipeline as pipeline;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config, validate_config, EncodingMode, ExperimentKind, OlfactoryConfig};
    pub use crate::encoding::{EncodingError, LatencyPolicy, RsaConfig, RsaEncoder};
    pub use crate::pipeline::{
        run_experiment, ClassificationReport, Classifier, CsvDataSource, DataSource, ExperimentOutcome,
        GridSearch, KernelSvm, PipelineError, Standardizer, SvmParams,
    };
}
