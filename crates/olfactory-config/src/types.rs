// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `olfactory_configuration.toml`.

use olfactory_encoding::RsaConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::experiment::ExperimentKind;
use crate::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OlfactoryConfig {
    pub system: SystemConfig,
    pub experiment: ExperimentConfig,
    /// Encoder parameters, defaults owned by the encoding crate
    pub rsa: RsaConfig,
    pub classifier: ClassifierConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
    /// Root folder holding the per-experiment CSV folders
    pub data_dir: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Which dataset to run and which preprocessing stages to apply
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub kind: ExperimentKind,
    pub standardize: bool,
    pub tune_hyperparams: bool,
    /// Route activations through the spike encoder before classification
    pub do_rsa: bool,
    pub encoding_mode: EncodingMode,
    /// Display names of the odor classes, indexed by label
    pub target_names: Vec<String>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            kind: ExperimentKind::default(),
            standardize: true,
            tune_hyperparams: true,
            do_rsa: false,
            encoding_mode: EncodingMode::default(),
            target_names: ["red", "green", "blue", "yellow"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/// Which spike-encoder output becomes the classifier features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// Per-channel counts sharing one firing budget per row
    #[default]
    Population,
    /// Per-channel totals with an independent budget per channel
    ChannelTotals,
}

impl EncodingMode {
    pub const ALL: [EncodingMode; 2] = [EncodingMode::Population, EncodingMode::ChannelTotals];

    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingMode::Population => "population",
            EncodingMode::ChannelTotals => "channel_totals",
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        EncodingMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "unknown encoding mode '{}', expected one of: population, channel_totals",
                    value
                ))
            })
    }
}

/// Kernel of the support vector classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    Linear,
    #[default]
    Rbf,
}

/// Classifier used when hyperparameter tuning is disabled
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub kernel: KernelKind,
    pub c: f64,
    /// RBF width; `None` means `1 / n_features`
    pub gamma: Option<f64>,
    pub seed: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kernel: KernelKind::Rbf,
            c: 1.0,
            gamma: None,
            seed: 42,
        }
    }
}

/// Cross-validated grid search
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub folds: usize,
    pub shuffle: bool,
    pub seed: u64,
    pub c_values: Vec<f64>,
    /// RBF candidates; one per (gamma, C) pair
    pub rbf_gammas: Vec<f64>,
    /// Also try a linear kernel for every C
    pub include_linear: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            folds: 3,
            shuffle: true,
            seed: 7,
            c_values: vec![1.0, 10.0, 100.0, 1000.0],
            rbf_gammas: vec![1e-1, 1e-5],
            include_linear: true,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write JSON log files next to console output
    pub file_logging: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_experiment() {
        let config = OlfactoryConfig::default();
        assert_eq!(config.experiment.kind, ExperimentKind::NoBgTrainNoBgTest);
        assert!(config.experiment.standardize);
        assert!(config.experiment.tune_hyperparams);
        assert!(!config.experiment.do_rsa);
        assert_eq!(config.experiment.target_names.len(), 4);
        assert_eq!(config.rsa, RsaConfig::default());
        assert_eq!(config.rsa.max_latency, 1000);
        assert_eq!(config.rsa.max_spikes, 20.0);
        assert_eq!(config.search.folds, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: OlfactoryConfig = toml::from_str(
            r#"
            [experiment]
            kind = "rs_bg_train_bg_test"
            do_rsa = true
            encoding_mode = "channel_totals"

            [rsa]
            sigmoid_rate = true
            expected_channels = 8

            [classifier]
            kernel = "linear"
            "#,
        )
        .unwrap();

        assert_eq!(config.experiment.kind, ExperimentKind::RsBgTrainBgTest);
        assert!(config.experiment.do_rsa);
        assert!(config.experiment.standardize);
        assert_eq!(config.experiment.encoding_mode, EncodingMode::ChannelTotals);
        assert!(config.rsa.sigmoid_rate);
        assert_eq!(config.rsa.expected_channels, Some(8));
        assert_eq!(config.rsa.latency_scale, 100.0);
        assert_eq!(config.classifier.kernel, KernelKind::Linear);
        assert_eq!(config.classifier.gamma, None);
    }

    #[test]
    fn test_encoding_mode_parse() {
        assert_eq!("Population".parse::<EncodingMode>().unwrap(), EncodingMode::Population);
        assert_eq!(
            "channel-totals".parse::<EncodingMode>().unwrap(),
            EncodingMode::ChannelTotals
        );
        assert!(matches!(
            "bins".parse::<EncodingMode>(),
            Err(ConfigError::InvalidValue(_))
        ));
        assert_eq!(EncodingMode::ChannelTotals.to_string(), "channel_totals");
    }
}
