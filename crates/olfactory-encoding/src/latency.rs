// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Latency model
//!
//! ```text
//! Desensitized:   L = a
//! Sigmoid:        r = 1 / (1 + exp(-(a - 0.5) × 10))
//!                 L = scale / r
//! Inverse rate:   L = scale / a          (a == 0  →  L = +∞)
//!
//! Clamp:          L > max_latency  →  L = max_latency
//!
//! Countable:      n = round_half_even(L)
//!                 n ≤ 0  →  n = 1
//! ```
//!
//! A lane with countable latency `n` fires at 0-indexed bin `j` when
//! `(j + 1) mod n == 0` and `n < max_latency`. Lanes whose latency saturated
//! at the horizon are silent.

use ndarray::{Array2, ArrayView2};

use crate::config::LatencyPolicy;

/// Activation at which the logistic rate reaches one half
pub const SIGMOID_CENTER: f64 = 0.5;

/// Steepness of the logistic rate curve
pub const SIGMOID_SLOPE: f64 = 10.0;

/// Logistic firing rate in (0, 1)
#[inline(always)]
pub fn logistic_rate(activation: f64) -> f64 {
    1.0 / (1.0 + (-(activation - SIGMOID_CENTER) * SIGMOID_SLOPE).exp())
}

/// Clamped latency of a single activation
#[inline(always)]
pub fn activation_latency(
    activation: f64,
    policy: LatencyPolicy,
    latency_scale: f64,
    max_latency: f64,
) -> f64 {
    let latency = match policy {
        LatencyPolicy::Desensitized => activation,
        LatencyPolicy::Sigmoid => latency_scale / logistic_rate(activation),
        LatencyPolicy::InverseRate => {
            // Matches both +0.0 and -0.0: a silent sensor never fires
            if activation == 0.0 {
                f64::INFINITY
            } else {
                latency_scale / activation
            }
        }
    };

    if latency > max_latency {
        max_latency
    } else {
        latency
    }
}

/// Latency matrix for a whole activation matrix
pub fn latency_matrix(
    activations: ArrayView2<f64>,
    policy: LatencyPolicy,
    latency_scale: f64,
    max_latency: usize,
) -> Array2<f64> {
    let horizon = max_latency as f64;
    activations.mapv(|a| activation_latency(a, policy, latency_scale, horizon))
}

/// Round to whole bins (ties to even) and floor at one bin per spike
#[inline(always)]
pub fn countable_latency(latency: f64) -> u64 {
    let rounded = latency.round_ties_even();
    if rounded <= 0.0 {
        1
    } else {
        rounded as u64
    }
}

/// Whether a lane with this countable latency fires at 0-indexed `bin`
#[inline(always)]
pub fn fires_at(bin: usize, latency: u64, max_latency: usize) -> bool {
    latency < max_latency as u64 && (bin as u64 + 1) % latency == 0
}
