// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property tests for the RSA encoder

use ndarray::{Array2, Axis};
use olfactory_encoding::{RsaConfig, RsaEncoder};
use proptest::prelude::*;

fn activation_matrix(max_rows: usize, max_channels: usize) -> impl Strategy<Value = Array2<f64>> {
    (1..=max_rows, 1..=max_channels).prop_flat_map(|(rows, channels)| {
        prop::collection::vec(0.0_f64..=1.0, rows * channels).prop_map(move |values| {
            Array2::from_shape_vec((rows, channels), values).expect("shape matches length")
        })
    })
}

fn rsa_config() -> impl Strategy<Value = RsaConfig> {
    (
        1.0_f64..500.0,
        any::<bool>(),
        1_usize..400,
        1.0_f64..40.0,
        any::<bool>(),
    )
        .prop_map(
            |(latency_scale, sigmoid_rate, max_latency, max_spikes, desensitize)| RsaConfig {
                latency_scale,
                sigmoid_rate,
                normalize_spikes: false,
                max_latency,
                max_spikes,
                desensitize,
                expected_channels: None,
            },
        )
}

proptest! {
    #[test]
    fn latencies_never_exceed_horizon(config in rsa_config(), activations in activation_matrix(6, 4)) {
        let encoder = RsaEncoder::new(config.clone()).unwrap();
        let latency = encoder.spike_latencies(activations.view()).unwrap();
        prop_assert_eq!(latency.dim(), activations.dim());
        for &l in latency.iter() {
            prop_assert!(l <= config.max_latency as f64);
        }
    }

    #[test]
    fn inverse_latency_is_non_increasing(
        scale in 1.0_f64..500.0,
        a in 0.0001_f64..=1.0,
        b in 0.0001_f64..=1.0,
    ) {
        let encoder = RsaEncoder::new(RsaConfig {
            latency_scale: scale,
            sigmoid_rate: false,
            ..RsaConfig::default()
        }).unwrap();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let latency = encoder
            .spike_latencies(ndarray::array![[low, high]].view())
            .unwrap();
        prop_assert!(latency[[0, 1]] <= latency[[0, 0]]);
    }

    #[test]
    fn lane_sums_respect_budget(config in rsa_config(), activations in activation_matrix(6, 4)) {
        let encoder = RsaEncoder::new(config.clone()).unwrap();
        let trains = encoder.count_n_spikes(activations.view()).unwrap();
        prop_assert_eq!(trains.dim(), (activations.nrows(), activations.ncols(), config.max_latency));

        // A lane stops in the bin that reaches the budget, so it can only
        // exceed a fractional budget by less than one spike
        for total in trains.sum_axis(Axis(2)).iter() {
            prop_assert!(*total <= config.max_spikes.ceil());
        }
    }

    #[test]
    fn integer_budget_is_never_exceeded(
        config in rsa_config(),
        budget in 1_u32..30,
        activations in activation_matrix(6, 4),
    ) {
        let config = RsaConfig { max_spikes: budget as f64, ..config };
        let encoder = RsaEncoder::new(config).unwrap();
        let trains = encoder.count_n_spikes(activations.view()).unwrap();
        for total in trains.sum_axis(Axis(2)).iter() {
            prop_assert!(*total <= budget as f64);
        }
    }

    #[test]
    fn normalization_reaches_budget_or_stays_silent(
        config in rsa_config(),
        activations in activation_matrix(6, 4),
    ) {
        let raw = RsaEncoder::new(config.clone()).unwrap();
        let normalized = RsaEncoder::new(RsaConfig { normalize_spikes: true, ..config.clone() }).unwrap();

        let raw_totals = raw.count_n_spikes(activations.view()).unwrap().sum_axis(Axis(2));
        let norm_totals = normalized.count_n_spikes(activations.view()).unwrap().sum_axis(Axis(2));

        for (before, after) in raw_totals.iter().zip(norm_totals.iter()) {
            if *before > 0.0 {
                prop_assert!((after - config.max_spikes).abs() < 1e-9);
            } else {
                prop_assert_eq!(*after, 0.0);
            }
        }
    }

    #[test]
    fn saturated_lanes_are_silent(
        max_latency in 2_usize..300,
        activations in activation_matrix(6, 4),
    ) {
        // Every latency rounds to the horizon once the scale pushes it past it
        let encoder = RsaEncoder::new(RsaConfig {
            latency_scale: max_latency as f64 * 10.0,
            sigmoid_rate: false,
            normalize_spikes: true,
            max_latency,
            max_spikes: 20.0,
            desensitize: false,
            expected_channels: None,
        }).unwrap();
        let trains = encoder.count_n_spikes(activations.view()).unwrap();
        prop_assert_eq!(trains.sum(), 0.0);
    }

    #[test]
    fn desensitized_latency_is_identity(activations in activation_matrix(6, 4)) {
        let encoder = RsaEncoder::new(RsaConfig { desensitize: true, ..RsaConfig::default() }).unwrap();
        prop_assert_eq!(encoder.spike_latencies(activations.view()).unwrap(), activations);
    }
}

proptest! {
    #[test]
    fn population_rows_overshoot_by_less_than_one_bin(
        config in rsa_config(),
        budget in 1_u32..30,
        activations in activation_matrix(6, 4),
    ) {
        // Channels firing in the budget-reaching bin all count
        let config = RsaConfig { max_spikes: budget as f64, ..config };
        let encoder = RsaEncoder::new(config).unwrap();
        let counts = encoder.population_spike_counts(activations.view()).unwrap();
        prop_assert_eq!(counts.dim(), activations.dim());

        let ceiling = (budget as usize + activations.ncols() - 1) as f64;
        for total in counts.sum_axis(Axis(1)).iter() {
            prop_assert!(*total <= ceiling);
        }
    }

    #[test]
    fn normalized_population_rows_sum_to_budget(
        config in rsa_config(),
        activations in activation_matrix(6, 4),
    ) {
        let raw = RsaEncoder::new(config.clone()).unwrap();
        let normalized = RsaEncoder::new(RsaConfig { normalize_spikes: true, ..config.clone() }).unwrap();

        let raw_totals = raw.population_spike_counts(activations.view()).unwrap().sum_axis(Axis(1));
        let norm_totals = normalized
            .population_spike_counts(activations.view())
            .unwrap()
            .sum_axis(Axis(1));

        for (before, after) in raw_totals.iter().zip(norm_totals.iter()) {
            if *before > 0.0 {
                prop_assert!((after - config.max_spikes).abs() < 1e-9);
            } else {
                prop_assert_eq!(*after, 0.0);
            }
        }
    }

    #[test]
    fn saturated_population_rows_stay_zero(
        max_latency in 2_usize..300,
        normalize_spikes in any::<bool>(),
        activations in activation_matrix(6, 4),
    ) {
        let encoder = RsaEncoder::new(RsaConfig {
            latency_scale: max_latency as f64 * 10.0,
            sigmoid_rate: false,
            normalize_spikes,
            max_latency,
            max_spikes: 20.0,
            desensitize: false,
            expected_channels: None,
        }).unwrap();
        let counts = encoder.population_spike_counts(activations.view()).unwrap();
        prop_assert!(counts.iter().all(|&c| c == 0.0));
    }
}

#[test]
fn small_activation_saturates_at_horizon() {
    let encoder = RsaEncoder::new(RsaConfig::default()).unwrap();
    let latency = encoder
        .spike_latencies(ndarray::array![[0.05, 0.001]].view())
        .unwrap();
    assert_eq!(latency, ndarray::array![[1000.0, 1000.0]]);
}

#[test]
fn latency_just_under_horizon_fires_once() {
    // 100 / 0.1001 ≈ 999.0 rounds to 999 < 1000: one spike at the last bin.
    // 100 / 0.1 = 1000 saturates and never fires.
    let encoder = RsaEncoder::new(RsaConfig {
        normalize_spikes: false,
        ..RsaConfig::default()
    })
    .unwrap();
    let trains = encoder
        .count_n_spikes(ndarray::array![[0.1001, 0.1]].view())
        .unwrap();
    assert_eq!(trains[[0, 0, 998]], 1.0);
    assert_eq!(trains.index_axis(Axis(1), 0).sum(), 1.0);
    assert_eq!(trains.index_axis(Axis(1), 1).sum(), 0.0);
}
