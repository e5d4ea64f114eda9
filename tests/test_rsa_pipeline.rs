// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end runs over CSV files laid out like the recorded datasets

use std::fs;
use std::path::Path;

use olfactory::config::{load_config, ExperimentKind, KernelKind, OlfactoryConfig};
use olfactory::pipeline::{run_experiment, CsvDataSource, PipelineError};
use tempfile::tempdir;

const ODORS: usize = 4;

/// Rows of (concentration, activation): odor `k` drives sensor `k`
fn recordings(samples_per_odor: usize, phase: usize) -> (String, String) {
    let mut concentration = String::new();
    let mut activation = String::new();
    for odor in 0..ODORS {
        for sample in 0..samples_per_odor {
            let jitter = ((sample + phase) % 5) as f64 * 0.02;
            let conc: Vec<String> = (0..ODORS)
                .map(|k| if k == odor { format!("{}", 1.0 + jitter) } else { "0".to_string() })
                .collect();
            let actv: Vec<String> = (0..ODORS)
                .map(|k| {
                    let value = if k == odor { 0.8 + jitter } else { 0.1 + jitter / 2.0 };
                    format!("{:.4}", value)
                })
                .collect();
            concentration.push_str(&conc.join(","));
            concentration.push('\n');
            activation.push_str(&actv.join(","));
            activation.push('\n');
        }
    }
    (concentration, activation)
}

fn write_experiment(data_dir: &Path, kind: ExperimentKind) {
    let paths = kind.dataset_paths(data_dir);
    fs::create_dir_all(data_dir.join(kind.folder())).unwrap();

    let (train_c, train_a) = recordings(5, 0);
    let (test_c, test_a) = recordings(2, 3);
    fs::write(&paths.train_concentration, train_c).unwrap();
    fs::write(&paths.train_activation, train_a).unwrap();
    fs::write(&paths.test_concentration, test_c).unwrap();
    fs::write(&paths.test_activation, test_a).unwrap();
}

fn linear_config(data_dir: &Path) -> OlfactoryConfig {
    let mut config = OlfactoryConfig::default();
    config.system.data_dir = data_dir.to_path_buf();
    config.experiment.tune_hyperparams = false;
    config.classifier.kernel = KernelKind::Linear;
    config.classifier.c = 10.0;
    config
}

#[test]
fn test_raw_activations_classify_every_odor() {
    let dir = tempdir().unwrap();
    write_experiment(dir.path(), ExperimentKind::NoBgTrainNoBgTest);

    let config = linear_config(dir.path());
    let outcome = run_experiment(&config, &CsvDataSource::default()).unwrap();

    assert_eq!(outcome.test_labels, vec![0, 0, 1, 1, 2, 2, 3, 3]);
    assert_eq!(outcome.accuracy(), 1.0);
    assert_eq!(outcome.report.confusion.correct(), 8);
    let text = outcome.report.to_string();
    for name in ["red", "green", "blue", "yellow", "avg / total"] {
        assert!(text.contains(name), "missing {} in\n{}", name, text);
    }
}

#[test]
fn test_spike_encoded_run_produces_a_full_report() {
    let dir = tempdir().unwrap();
    write_experiment(dir.path(), ExperimentKind::BgTrainBgTest);

    let mut config = linear_config(dir.path());
    config.experiment.kind = ExperimentKind::BgTrainBgTest;
    config.experiment.do_rsa = true;
    let outcome = run_experiment(&config, &CsvDataSource::default()).unwrap();

    assert_eq!(outcome.predictions.len(), 8);
    assert_eq!(outcome.report.average.support, 8);
    assert!((0.0..=1.0).contains(&outcome.accuracy()));
}

#[test]
fn test_config_file_selects_rescaled_files() {
    let dir = tempdir().unwrap();
    write_experiment(dir.path(), ExperimentKind::RsNoBgTrainBgTest);

    let config_path = dir.path().join("olfactory_configuration.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[system]
data_dir = "{}"

[experiment]
kind = "rs_no_bg_train_bg_test"
tune_hyperparams = false

[classifier]
kernel = "linear"
c = 10.0
"#,
            dir.path().display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let config = load_config(Some(&config_path), None).unwrap();
    assert_eq!(config.experiment.kind, ExperimentKind::RsNoBgTrainBgTest);

    let outcome = run_experiment(&config, &CsvDataSource::default()).unwrap();
    assert_eq!(outcome.kind, ExperimentKind::RsNoBgTrainBgTest);
    assert_eq!(outcome.accuracy(), 1.0);
}

#[test]
fn test_missing_dataset_is_an_io_error() {
    let dir = tempdir().unwrap();
    let config = linear_config(dir.path());
    assert!(matches!(
        run_experiment(&config, &CsvDataSource::default()),
        Err(PipelineError::Io { .. })
    ));
}
