// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Olfactory spike encoding
//!
//! Rate-to-spike-train encoding ("RSA") of olfactory sensor activations:
//! - **Latency model**: activation → first-spike latency (inverse rate,
//!   logistic rate, or desensitized passthrough), clamped to the horizon
//! - **Spike simulation**: periodic firing at every multiple of the rounded
//!   latency, stopped by a per-lane firing budget
//! - **Normalization**: optional rescaling of active lanes to the budget
//!
//! ## Usage
//!
//! ```rust
//! use ndarray::array;
//! use olfactory_encoding::{RsaConfig, RsaEncoder};
//!
//! let encoder = RsaEncoder::new(RsaConfig {
//!     normalize_spikes: false,
//!     ..RsaConfig::default()
//! })?;
//!
//! let trains = encoder.encode_channel(array![0.5].view())?;
//! assert_eq!(trains.sum(), 5.0);
//! # Ok::<(), olfactory_encoding::EncodingError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod encoder;
pub mod error;
pub mod latency;
pub mod spike_train;

pub use config::{LatencyPolicy, RsaConfig, MAX_LATENCY_LIMIT};
pub use encoder::RsaEncoder;
pub use error::{EncodingError, Result};
