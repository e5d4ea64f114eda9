// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{
    ConfigError, ConfigResult, EncodingMode, ExperimentKind, OlfactoryConfig, CONFIG_FILE_NAME,
};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the olfactory configuration file
///
/// Search order:
/// 1. `OLFACTORY_CONFIG_PATH` environment variable
/// 2. Current working directory: `./olfactory_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("OLFACTORY_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by OLFACTORY_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|path| path.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet OLFACTORY_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<OlfactoryConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: OlfactoryConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Like [`load_config`] with discovery, but falls back to built-in defaults
/// when no file exists anywhere. Returns the file that was used, if any.
///
/// A file that exists but cannot be read or parsed is still an error.
pub fn load_config_or_default(
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<(OlfactoryConfig, Option<PathBuf>)> {
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args).map(|config| (config, Some(path))),
        Err(ConfigError::FileNotFound(_)) if env::var("OLFACTORY_CONFIG_PATH").is_err() => {
            let mut config = OlfactoryConfig::default();
            apply_environment_overrides(&mut config)?;
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli)?;
            }
            Ok((config, None))
        }
        Err(err) => Err(err),
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `OLFACTORY_DATA_DIR` -> `system.data_dir`
/// - `OLFACTORY_LOG_LEVEL` -> `system.log_level`
/// - `OLFACTORY_EXPERIMENT` -> `experiment.kind`
/// - `OLFACTORY_STANDARDIZE` -> `experiment.standardize`
/// - `OLFACTORY_TUNE_HYPERPARAMS` -> `experiment.tune_hyperparams`
/// - `OLFACTORY_DO_RSA` -> `experiment.do_rsa`
/// - `OLFACTORY_ENCODING_MODE` -> `experiment.encoding_mode`
/// - `OLFACTORY_SEARCH_FOLDS` -> `search.folds`
/// - `OLFACTORY_LOG_DIR` -> `logging.log_dir`
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an unknown experiment or encoding
/// mode. Unparseable numbers leave the setting untouched.
pub fn apply_environment_overrides(config: &mut OlfactoryConfig) -> ConfigResult<()> {
    // System settings
    if let Ok(value) = env::var("OLFACTORY_DATA_DIR") {
        config.system.data_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("OLFACTORY_LOG_LEVEL") {
        config.system.log_level = value;
    }

    // Experiment settings
    if let Ok(value) = env::var("OLFACTORY_EXPERIMENT") {
        config.experiment.kind = value.parse::<ExperimentKind>()?;
    }
    if let Ok(value) = env::var("OLFACTORY_STANDARDIZE") {
        config.experiment.standardize = parse_flag(&value);
    }
    if let Ok(value) = env::var("OLFACTORY_TUNE_HYPERPARAMS") {
        config.experiment.tune_hyperparams = parse_flag(&value);
    }
    if let Ok(value) = env::var("OLFACTORY_DO_RSA") {
        config.experiment.do_rsa = parse_flag(&value);
    }
    if let Ok(value) = env::var("OLFACTORY_ENCODING_MODE") {
        config.experiment.encoding_mode = value.parse::<EncodingMode>()?;
    }

    // Search settings
    if let Ok(value) = env::var("OLFACTORY_SEARCH_FOLDS") {
        if let Ok(folds) = value.parse::<usize>() {
            config.search.folds = folds;
        }
    }

    // Logging settings
    if let Ok(value) = env::var("OLFACTORY_LOG_DIR") {
        config.logging.log_dir = PathBuf::from(value);
    }

    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"experiment": "bg_train_bg_test", "do_rsa": "true"}`)
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an unknown experiment or encoding mode
pub fn apply_cli_overrides(
    config: &mut OlfactoryConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    // System settings
    if let Some(value) = cli_args.get("data_dir") {
        config.system.data_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.system.log_level = value.clone();
    }

    // Experiment settings
    if let Some(value) = cli_args.get("experiment") {
        config.experiment.kind = value.parse::<ExperimentKind>()?;
    }
    if let Some(value) = cli_args.get("standardize") {
        config.experiment.standardize = parse_flag(value);
    }
    if let Some(value) = cli_args.get("tune_hyperparams") {
        config.experiment.tune_hyperparams = parse_flag(value);
    }
    if let Some(value) = cli_args.get("do_rsa") {
        config.experiment.do_rsa = parse_flag(value);
    }
    if let Some(value) = cli_args.get("encoding_mode") {
        config.experiment.encoding_mode = value.parse::<EncodingMode>()?;
    }

    // Search and classifier settings
    if let Some(value) = cli_args.get("folds") {
        if let Ok(folds) = value.parse::<usize>() {
            config.search.folds = folds;
        }
    }
    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.search.seed = seed;
            config.classifier.seed = seed;
        }
    }

    Ok(())
}
