// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Odor classification from electronic-nose recordings
//!
//! Loads the configured train/test split, optionally spike-encodes and
//! standardizes the activations, trains a kernel SVM (with or without grid
//! search) and prints the classification report.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use olfactory_config::{
    load_config, load_config_or_default, validate_config, EncodingMode, ExperimentKind, OlfactoryConfig,
};
use olfactory_observability::{debug_flags_help, init_logging, parse_debug_flags, LoggingOptions};
use olfactory_pipeline::{run_experiment, CsvDataSource, ExperimentOutcome};

/// Olfactory SVM - spike-encoded odor classification
#[derive(Parser, Debug)]
#[command(name = "olfactory-svm", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Configuration file (default: search for olfactory_configuration.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Experiment to run (e.g. "bg_train_bg_test", "rs_no_bg_train_bg_test")
    #[arg(short, long)]
    experiment: Option<ExperimentKind>,

    /// Folder holding the per-experiment CSV folders
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Spike-encode activations before classification
    #[arg(long, default_value_t = false)]
    rsa: bool,

    /// Spike feature layout: "population" or "channel_totals"
    #[arg(long)]
    encoding_mode: Option<EncodingMode>,

    /// Skip per-column standardization
    #[arg(long, default_value_t = false)]
    no_standardize: bool,

    /// Train the configured classifier instead of running the grid search
    #[arg(long, default_value_t = false)]
    no_tune: bool,

    /// Cross-validation folds of the grid search
    #[arg(long)]
    folds: Option<usize>,

    /// Seed for fold shuffling and the classifier solver
    #[arg(long)]
    seed: Option<u64>,

    /// Base log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable debug logging for a crate ("all" for every crate); repeatable
    #[arg(long = "debug", value_name = "CRATE", value_delimiter = ',')]
    debug: Vec<String>,
}

impl Args {
    /// Overrides in the key format understood by `apply_cli_overrides`
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(kind) = self.experiment {
            overrides.insert("experiment".to_string(), kind.as_str().to_string());
        }
        if let Some(dir) = &self.data_dir {
            overrides.insert("data_dir".to_string(), dir.display().to_string());
        }
        if self.rsa {
            overrides.insert("do_rsa".to_string(), "true".to_string());
        }
        if let Some(mode) = self.encoding_mode {
            overrides.insert("encoding_mode".to_string(), mode.as_str().to_string());
        }
        if self.no_standardize {
            overrides.insert("standardize".to_string(), "false".to_string());
        }
        if self.no_tune {
            overrides.insert("tune_hyperparams".to_string(), "false".to_string());
        }
        if let Some(folds) = self.folds {
            overrides.insert("folds".to_string(), folds.to_string());
        }
        if let Some(seed) = self.seed {
            overrides.insert("seed".to_string(), seed.to_string());
        }
        if let Some(level) = &self.log_level {
            overrides.insert("log_level".to_string(), level.clone());
        }
        overrides
    }
}

fn logging_options(config: &OlfactoryConfig) -> LoggingOptions {
    LoggingOptions {
        level: config.system.log_level.clone(),
        file_logging: config.logging.file_logging,
        log_dir: config.logging.log_dir.clone(),
        retention_days: config.logging.retention_days,
        retention_runs: config.logging.retention_runs,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let overrides = args.overrides();

    let (config, config_file) = match &args.config {
        Some(path) => {
            let config = load_config(Some(path), Some(&overrides))
                .with_context(|| format!("Failed to load {}", path.display()))?;
            (config, Some(path.clone()))
        }
        None => load_config_or_default(Some(&overrides))?,
    };
    validate_config(&config)?;

    let debug_flags = parse_debug_flags(&args.debug);
    let logging = init_logging(&debug_flags, &logging_options(&config))?;

    print_banner();
    match &config_file {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: built-in defaults"),
    }
    if let Some(dir) = logging.log_dir() {
        info!("Log files: {}", dir.display());
    }

    let outcome = run_experiment(&config, &CsvDataSource::default())
        .with_context(|| format!("Experiment {} failed", config.experiment.kind))?;

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &ExperimentOutcome) {
    if outcome.search_scores.is_some() {
        println!("Best Classifier: {}", outcome.classifier);
    } else {
        println!("Classifier: {}", outcome.classifier);
    }
    println!();
    println!("Confusion matrix (rows = target, columns = predicted):");
    print!("{}", outcome.report.confusion);
    println!();
    print!("{}", outcome.report);
    println!();
    println!("Accuracy Score: {}", outcome.accuracy());
}

fn print_banner() {
    println!(
        r#"
╔═══════════════════════════════════════════════════════════════════╗
║                                                                   ║
║   Olfactory SVM v{:<49}║
║   Spike-encoded odor classification                               ║
║                                                                   ║
╚═══════════════════════════════════════════════════════════════════╝
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
