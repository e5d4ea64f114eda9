// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging options handed to [`crate::init_logging`]

use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingOptions {
    /// Base level (trace, debug, info, warn/warning, error)
    pub level: String,

    /// Write JSON log files next to console output
    pub file_logging: bool,

    /// Base directory holding one `run_<timestamp>` folder per run
    pub log_dir: PathBuf,

    /// Keep run folders for N days
    pub retention_days: u64,

    /// Keep the N most recent run folders
    pub retention_runs: usize,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
