// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! RSA configuration record and latency policy selection

use serde::{Deserialize, Serialize};

use crate::error::{EncodingError, Result};

/// Longest simulation horizon accepted, in bins
pub const MAX_LATENCY_LIMIT: usize = 1_000_000;

/// Immutable parameters of the rate-to-spike-train encoder.
///
/// Defaults match the values used by the olfactory SVM experiments:
/// a latency scale of 100 bins, a 1000-bin horizon, a 20-spike budget,
/// the direct inverse latency model and normalized spike trains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsaConfig {
    /// Numerator of the latency model (bins)
    pub latency_scale: f64,

    /// Use the logistic rate nonlinearity instead of the direct inverse
    pub sigmoid_rate: bool,

    /// Rescale every active lane/row so it sums to `max_spikes`
    pub normalize_spikes: bool,

    /// Simulation horizon and latency clamp ceiling (bins)
    pub max_latency: usize,

    /// Firing budget per lane/row
    pub max_spikes: f64,

    /// Bypass the rate model; latency becomes the raw activation
    pub desensitize: bool,

    /// When set, every activation matrix must have exactly this many columns
    pub expected_channels: Option<usize>,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            latency_scale: 100.0,
            sigmoid_rate: false,
            normalize_spikes: true,
            max_latency: 1000,
            max_spikes: 20.0,
            desensitize: false,
            expected_channels: None,
        }
    }
}

impl RsaConfig {
    /// Reject parameter combinations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.latency_scale.is_finite() || self.latency_scale <= 0.0 {
            return Err(EncodingError::InvalidConfiguration(format!(
                "latency_scale must be a positive finite number, got {}",
                self.latency_scale
            )));
        }
        if self.max_latency == 0 || self.max_latency > MAX_LATENCY_LIMIT {
            return Err(EncodingError::InvalidConfiguration(format!(
                "max_latency must be between 1 and {}, got {}",
                MAX_LATENCY_LIMIT, self.max_latency
            )));
        }
        if !self.max_spikes.is_finite() || self.max_spikes <= 0.0 {
            return Err(EncodingError::InvalidConfiguration(format!(
                "max_spikes must be a positive finite number, got {}",
                self.max_spikes
            )));
        }
        if self.expected_channels == Some(0) {
            return Err(EncodingError::InvalidConfiguration(
                "expected_channels must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Latency policy selected by the flags (desensitize wins over sigmoid)
    pub fn latency_policy(&self) -> LatencyPolicy {
        if self.desensitize {
            LatencyPolicy::Desensitized
        } else if self.sigmoid_rate {
            LatencyPolicy::Sigmoid
        } else {
            LatencyPolicy::InverseRate
        }
    }
}

/// How an activation becomes a latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyPolicy {
    /// latency = activation
    Desensitized,
    /// latency = scale / logistic(activation)
    Sigmoid,
    /// latency = scale / activation
    InverseRate,
}
