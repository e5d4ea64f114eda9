// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for spike encoding

/// Errors raised by the RSA encoder
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    /// Rejected at construction time, never mid-simulation
    #[error("Invalid RSA configuration: {0}")]
    InvalidConfiguration(String),

    /// Activation matrix holds a value the latency model cannot interpret
    #[error("Malformed activation at row {row}, column {column}: {value}")]
    MalformedInput { row: usize, column: usize, value: f64 },

    #[error("Channel count mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Spike tensor of {rows} x {channels} x {bins} does not fit in memory")]
    TensorTooLarge { rows: usize, channels: usize, bins: usize },
}

pub type Result<T> = core::result::Result<T, EncodingError>;
