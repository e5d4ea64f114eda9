// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent and within valid ranges before any experiment starts.

use olfactory_encoding::MAX_LATENCY_LIMIT;

use crate::{ConfigError, ConfigResult, OlfactoryConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Required fields
/// - Encoder parameter ranges
/// - Classifier and search parameter ranges
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &OlfactoryConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_rsa(config, &mut errors);
    validate_classifier(config, &mut errors);
    validate_search(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn invalid(errors: &mut Vec<ConfigValidationError>, field: &str, reason: String) {
    errors.push(ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason,
    });
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn validate_required_fields(config: &OlfactoryConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.system.data_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "system.data_dir".to_string(),
        });
    }
    if config.experiment.target_names.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "experiment.target_names".to_string(),
        });
    }
    if !LOG_LEVELS.contains(&config.system.log_level.to_lowercase().as_str()) {
        invalid(
            errors,
            "system.log_level",
            format!("'{}' is not a known level", config.system.log_level),
        );
    }
}

fn validate_rsa(config: &OlfactoryConfig, errors: &mut Vec<ConfigValidationError>) {
    let rsa = &config.rsa;
    if !is_positive(rsa.latency_scale) {
        invalid(errors, "rsa.latency_scale", format!("must be > 0, got {}", rsa.latency_scale));
    }
    if rsa.max_latency == 0 || rsa.max_latency > MAX_LATENCY_LIMIT {
        invalid(
            errors,
            "rsa.max_latency",
            format!("must be between 1 and {}, got {}", MAX_LATENCY_LIMIT, rsa.max_latency),
        );
    }
    if !is_positive(rsa.max_spikes) {
        invalid(errors, "rsa.max_spikes", format!("must be > 0, got {}", rsa.max_spikes));
    }
    if rsa.expected_channels == Some(0) {
        invalid(errors, "rsa.expected_channels", "must be at least 1 when set".to_string());
    }
}

fn validate_classifier(config: &OlfactoryConfig, errors: &mut Vec<ConfigValidationError>) {
    let classifier = &config.classifier;
    if !is_positive(classifier.c) {
        invalid(errors, "classifier.c", format!("must be > 0, got {}", classifier.c));
    }
    if let Some(gamma) = classifier.gamma {
        if !is_positive(gamma) {
            invalid(errors, "classifier.gamma", format!("must be > 0, got {}", gamma));
        }
    }
}

fn validate_search(config: &OlfactoryConfig, errors: &mut Vec<ConfigValidationError>) {
    let search = &config.search;
    if search.folds < 2 {
        invalid(errors, "search.folds", format!("must be at least 2, got {}", search.folds));
    }
    if search.c_values.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "search.c_values".to_string(),
        });
    }
    if let Some(bad) = search.c_values.iter().find(|c| !is_positive(**c)) {
        invalid(errors, "search.c_values", format!("every C must be > 0, got {}", bad));
    }
    if let Some(bad) = search.rbf_gammas.iter().find(|g| !is_positive(**g)) {
        invalid(errors, "search.rbf_gammas", format!("every gamma must be > 0, got {}", bad));
    }
    if search.rbf_gammas.is_empty() && !search.include_linear {
        invalid(
            errors,
            "search",
            "grid is empty: set rbf_gammas or include_linear".to_string(),
        );
    }
}

fn validate_logging(config: &OlfactoryConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.logging.file_logging && config.logging.log_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.log_dir".to_string(),
        });
    }
    if config.logging.retention_runs == 0 {
        invalid(errors, "logging.retention_runs", "must be at least 1".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_every_problem() {
        let mut config = OlfactoryConfig::default();
        config.rsa.latency_scale = -1.0;
        config.rsa.max_latency = 0;
        config.search.folds = 1;
        config.classifier.gamma = Some(0.0);

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("rsa.latency_scale"));
        assert!(err.contains("rsa.max_latency"));
        assert!(err.contains("search.folds"));
        assert!(err.contains("classifier.gamma"));
    }

    #[test]
    fn test_horizon_beyond_limit_rejected() {
        let mut config = OlfactoryConfig::default();
        config.rsa.max_latency = MAX_LATENCY_LIMIT + 1;
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("rsa.max_latency"));

        config.rsa.max_latency = MAX_LATENCY_LIMIT;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let mut config = OlfactoryConfig::default();
        config.search.rbf_gammas.clear();
        config.search.include_linear = false;
        assert!(validate_config(&config).is_err());

        config.search.include_linear = true;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = OlfactoryConfig::default();
        config.system.log_level = "chatty".to_string();
        assert!(validate_config(&config).is_err());

        config.system.log_level = "WARNING".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
