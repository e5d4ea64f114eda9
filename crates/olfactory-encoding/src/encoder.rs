// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Rate-to-spike-train encoder

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};
use tracing::debug;

use crate::config::{LatencyPolicy, RsaConfig};
use crate::error::{EncodingError, Result};
use crate::latency::{countable_latency, latency_matrix};
use crate::spike_train::{lane_totals, population_counts, spike_train_tensor};

/// Converts activation matrices into latencies and spike trains.
///
/// The encoder holds only its validated configuration; every operation is a
/// pure function of that configuration and the input matrix, so the same
/// encoder can be shared between training and test data.
#[derive(Debug, Clone)]
pub struct RsaEncoder {
    config: RsaConfig,
    policy: LatencyPolicy,
}

impl RsaEncoder {
    /// Validate the configuration and build an encoder
    pub fn new(config: RsaConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.latency_policy();
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    pub fn policy(&self) -> LatencyPolicy {
        self.policy
    }

    /// Clamped latency of every activation, same shape as the input
    pub fn spike_latencies(&self, activations: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_channels(activations.ncols())?;
        check_finite(activations)?;
        Ok(self.latencies_unchecked(activations))
    }

    /// Spike trains of shape (rows, channels, max_latency).
    ///
    /// Each (row, channel) lane is simulated independently with its own
    /// firing budget.
    pub fn count_n_spikes(&self, activations: ArrayView2<f64>) -> Result<Array3<f64>> {
        self.check_channels(activations.ncols())?;
        check_finite(activations)?;
        check_tensor_len(activations.nrows(), activations.ncols(), self.config.max_latency)?;
        Ok(self.tensor_unchecked(activations))
    }

    /// Spike trains of a single channel, shape (rows, max_latency)
    pub fn encode_channel(&self, activations: ArrayView1<f64>) -> Result<Array2<f64>> {
        let column = activations.insert_axis(Axis(1));
        check_finite(column)?;
        check_tensor_len(column.nrows(), 1, self.config.max_latency)?;
        Ok(self.tensor_unchecked(column).index_axis_move(Axis(1), 0))
    }

    /// Sum of every lane of [`count_n_spikes`](Self::count_n_spikes), shape (rows, channels)
    pub fn channel_totals(&self, activations: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_channels(activations.ncols())?;
        check_finite(activations)?;
        let latency = self.countable_latencies(activations);
        let totals = lane_totals(
            &latency,
            self.config.max_latency,
            self.config.max_spikes,
            self.config.normalize_spikes,
        );
        debug!(
            rows = totals.nrows(),
            channels = totals.ncols(),
            silent_lanes = totals.iter().filter(|&&t| t == 0.0).count(),
            "computed per-channel spike totals"
        );
        Ok(totals)
    }

    /// Per-channel spike counts with one firing budget shared by the whole row
    pub fn population_spike_counts(&self, activations: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_channels(activations.ncols())?;
        check_finite(activations)?;
        let latency = self.countable_latencies(activations);
        let counts = population_counts(
            &latency,
            self.config.max_latency,
            self.config.max_spikes,
            self.config.normalize_spikes,
        );
        debug!(
            rows = counts.nrows(),
            channels = counts.ncols(),
            silent_rows = counts
                .rows()
                .into_iter()
                .filter(|row| row.iter().all(|&c| c == 0.0))
                .count(),
            "computed population spike counts"
        );
        Ok(counts)
    }

    fn latencies_unchecked(&self, activations: ArrayView2<f64>) -> Array2<f64> {
        latency_matrix(
            activations,
            self.policy,
            self.config.latency_scale,
            self.config.max_latency,
        )
    }

    fn countable_latencies(&self, activations: ArrayView2<f64>) -> Array2<u64> {
        self.latencies_unchecked(activations)
            .mapv(countable_latency)
    }

    fn tensor_unchecked(&self, activations: ArrayView2<f64>) -> Array3<f64> {
        let latency = self.countable_latencies(activations);
        let trains = spike_train_tensor(
            &latency,
            self.config.max_latency,
            self.config.max_spikes,
            self.config.normalize_spikes,
        );
        debug!(
            rows = latency.nrows(),
            channels = latency.ncols(),
            horizon = self.config.max_latency,
            "simulated spike trains"
        );
        trains
    }

    fn check_channels(&self, actual: usize) -> Result<()> {
        match self.config.expected_channels {
            Some(expected) if expected != actual => {
                Err(EncodingError::ShapeMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

/// First non-finite activation, if any, is reported with its position
fn check_finite(activations: ArrayView2<f64>) -> Result<()> {
    match activations
        .indexed_iter()
        .find(|(_, value)| !value.is_finite())
    {
        Some(((row, column), &value)) => Err(EncodingError::MalformedInput { row, column, value }),
        None => Ok(()),
    }
}

/// Element count of a (rows, channels, bins) tensor, if it can be allocated
fn check_tensor_len(rows: usize, channels: usize, bins: usize) -> Result<usize> {
    let limit = isize::MAX as usize / std::mem::size_of::<f64>();
    rows.checked_mul(channels)
        .and_then(|lanes| lanes.checked_mul(bins))
        .filter(|&len| len <= limit)
        .ok_or(EncodingError::TensorTooLarge {
            rows,
            channels,
            bins,
        })
}
