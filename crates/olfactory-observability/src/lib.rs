// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # olfactory-observability
//!
//! Logging setup shared by the olfactory crates, with per-crate debug flags.
//!
//! ## Features
//! - `file-logging`: per-run JSON log files with retention

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "olfactory",
    "olfactory-config",
    "olfactory-encoding",
    "olfactory-pipeline",
    "olfactory-svm",
];
