// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug flags
//!
//! Crates are named either by package name (`olfactory-encoding`) or by
//! tracing target (`olfactory_encoding`); `all` enables every known crate.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Set of crates whose logs are raised to `debug`
///
/// # Example
/// ```rust
/// use olfactory_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_crate_names(["olfactory-encoding"]);
/// assert!(flags.is_enabled("olfactory_encoding"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    enabled_crates: BTreeSet<String>,
}

/// Tracing targets use underscores where package names use hyphens
fn target_name(crate_name: &str) -> String {
    crate_name.trim().replace('-', "_")
}

impl CrateDebugFlags {
    pub fn from_crate_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for name in names {
            flags.enable(name.as_ref());
        }
        flags
    }

    /// Enable one crate, or every known crate for `all`
    pub fn enable(&mut self, crate_name: &str) {
        let crate_name = crate_name.trim();
        if crate_name.is_empty() {
            return;
        }
        if crate_name == "all" {
            for known in KNOWN_CRATES {
                self.enabled_crates.insert(target_name(known));
            }
        } else {
            self.enabled_crates.insert(target_name(crate_name));
        }
    }

    /// Merge the comma-separated `OLFACTORY_DEBUG` environment variable
    pub fn extend_from_env(&mut self) {
        if let Ok(value) = env::var("OLFACTORY_DEBUG") {
            for crate_name in value.split(',') {
                self.enable(crate_name);
            }
        }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(&target_name(crate_name))
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level for a crate
    ///
    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Build an `EnvFilter` directive string
    ///
    /// Format: `"info,olfactory_encoding=debug"`; the base level applies to
    /// every crate without a debug flag.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        let mut directives = vec![normalize_level(base_level)];
        directives.extend(
            self.enabled_crates
                .iter()
                .map(|target| format!("{}=debug", target)),
        );
        directives.join(",")
    }
}

/// Map configuration spellings onto `EnvFilter` level names
pub fn normalize_level(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "" => "info".to_string(),
        other => other.to_string(),
    }
}

/// Parse debug flags from explicit crate names plus `OLFACTORY_DEBUG`
pub fn parse_debug_flags<I, S>(names: I) -> CrateDebugFlags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = CrateDebugFlags::from_crate_names(names);
    flags.extend_from_env();
    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug all                    Enable debug logging for all crates
  --debug {{crate-name}}           Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  OLFACTORY_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  OLFACTORY_DEBUG=all                             Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}
