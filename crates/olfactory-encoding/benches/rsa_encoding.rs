// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! RSA encoder microbenchmark
//!
//! Compares the three encoder outputs on sensor-array sized inputs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use olfactory_encoding::{RsaConfig, RsaEncoder};

/// Deterministic activations spread over [0, 1]
fn generate_activations(rows: usize, channels: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, channels), |(i, j)| {
        ((i * 31 + j * 17) % 1000) as f64 / 1000.0
    })
}

fn bench_encoder(c: &mut Criterion) {
    let encoder = RsaEncoder::new(RsaConfig::default()).expect("default config is valid");
    let mut group = c.benchmark_group("rsa_encoding");

    for &rows in &[100_usize, 1_000] {
        let activations = generate_activations(rows, 8);

        group.bench_with_input(
            BenchmarkId::new("population_spike_counts", rows),
            &activations,
            |b, x| b.iter(|| encoder.population_spike_counts(black_box(x.view()))),
        );
        group.bench_with_input(
            BenchmarkId::new("channel_totals", rows),
            &activations,
            |b, x| b.iter(|| encoder.channel_totals(black_box(x.view()))),
        );
        group.bench_with_input(
            BenchmarkId::new("count_n_spikes", rows),
            &activations,
            |b, x| b.iter(|| encoder.count_n_spikes(black_box(x.view()))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_encoder);
criterion_main!(benches);
