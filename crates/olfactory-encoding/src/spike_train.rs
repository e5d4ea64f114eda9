// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike-count simulation
//!
//! Every lane (one row, one channel) is scanned bin by bin with a running
//! spike counter; the scan stops once the counter reaches the firing budget.
//! Rows are independent and processed in parallel, bins within a lane are not.

use ndarray::{Array2, Array3, ArrayViewMut1, Axis, Zip};

use crate::latency::fires_at;

/// Scan one lane and report each emitted spike's bin to `on_spike`.
///
/// Returns the number of spikes emitted. The bin that reaches `max_spikes`
/// is included; nothing after it is.
#[inline]
pub fn scan_lane(
    latency: u64,
    max_latency: usize,
    max_spikes: f64,
    mut on_spike: impl FnMut(usize),
) -> f64 {
    let mut emitted = 0.0;
    for bin in 0..max_latency {
        if fires_at(bin, latency, max_latency) {
            on_spike(bin);
            emitted += 1.0;
        }
        if emitted >= max_spikes {
            break;
        }
    }
    emitted
}

/// Rescale so the values sum to `max_spikes`; silent lanes stay silent
#[inline]
pub fn normalize_lane(mut lane: ArrayViewMut1<f64>, emitted: f64, max_spikes: f64) {
    if emitted > 0.0 {
        let scale = max_spikes / emitted;
        lane.mapv_inplace(|v| v * scale);
    }
}

/// Simulate every lane into a (rows, channels, max_latency) tensor
pub fn spike_train_tensor(
    latency: &Array2<u64>,
    max_latency: usize,
    max_spikes: f64,
    normalize: bool,
) -> Array3<f64> {
    let (rows, channels) = latency.dim();
    let mut trains = Array3::<f64>::zeros((rows, channels, max_latency));

    Zip::from(trains.lanes_mut(Axis(2)))
        .and(latency)
        .par_for_each(|mut lane, &lane_latency| {
            let emitted = scan_lane(lane_latency, max_latency, max_spikes, |bin| {
                lane[bin] += 1.0;
            });
            if normalize {
                normalize_lane(lane, emitted, max_spikes);
            }
        });

    trains
}

/// Per-lane spike totals without materializing the time axis
pub fn lane_totals(
    latency: &Array2<u64>,
    max_latency: usize,
    max_spikes: f64,
    normalize: bool,
) -> Array2<f64> {
    let mut totals = Array2::<f64>::zeros(latency.dim());

    Zip::from(&mut totals)
        .and(latency)
        .par_for_each(|total, &lane_latency| {
            let emitted = scan_lane(lane_latency, max_latency, max_spikes, |_| {});
            *total = if normalize && emitted > 0.0 {
                max_spikes
            } else {
                emitted
            };
        });

    totals
}

/// Per-channel spike counts where all channels of a row share one budget.
///
/// All channels firing in the same bin are counted before the budget is
/// checked, so a row may overshoot `max_spikes` by up to `channels - 1`.
pub fn population_counts(
    latency: &Array2<u64>,
    max_latency: usize,
    max_spikes: f64,
    normalize: bool,
) -> Array2<f64> {
    let mut counts = Array2::<f64>::zeros(latency.dim());

    Zip::from(counts.rows_mut())
        .and(latency.rows())
        .par_for_each(|mut row_counts, row_latency| {
            let mut emitted = 0.0;
            for bin in 0..max_latency {
                for (count, &lane_latency) in row_counts.iter_mut().zip(row_latency.iter()) {
                    if fires_at(bin, lane_latency, max_latency) {
                        *count += 1.0;
                        emitted += 1.0;
                    }
                }
                if emitted >= max_spikes {
                    break;
                }
            }
            if normalize {
                normalize_lane(row_counts, emitted, max_spikes);
            }
        });

    counts
}
