// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end experiment: load, encode, standardize, train, predict, report

use ndarray::{Array2, ArrayView2};
use olfactory_config::{validate_config, EncodingMode, ExperimentKind, OlfactoryConfig};
use olfactory_encoding::RsaEncoder;
use tracing::info;

use crate::classifier::{Classifier, KernelSvm, SvmParams};
use crate::data::{DataSource, ExperimentData};
use crate::error::Result;
use crate::report::ClassificationReport;
use crate::search::{CandidateScore, GridSearch};
use crate::standardize::Standardizer;

/// Spike-encoded features of an activation matrix
pub fn encode_features(encoder: &RsaEncoder, mode: EncodingMode, activations: ArrayView2<f64>) -> Result<Array2<f64>> {
    let features = match mode {
        EncodingMode::Population => encoder.population_spike_counts(activations)?,
        EncodingMode::ChannelTotals => encoder.channel_totals(activations)?,
    };
    Ok(features)
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    pub kind: ExperimentKind,
    /// Parameters of the classifier that produced `predictions`
    pub classifier: SvmParams,
    /// Candidate scores, present when hyperparameters were tuned
    pub search_scores: Option<Vec<CandidateScore>>,
    pub predictions: Vec<usize>,
    pub test_labels: Vec<usize>,
    pub report: ClassificationReport,
}

impl ExperimentOutcome {
    pub fn accuracy(&self) -> f64 {
        self.report.accuracy
    }
}

/// Run the configured experiment against `source`
pub fn run_experiment(config: &OlfactoryConfig, source: &dyn DataSource) -> Result<ExperimentOutcome> {
    validate_config(config)?;

    let kind = config.experiment.kind;
    let paths = kind.dataset_paths(&config.system.data_dir);
    info!(experiment = %kind, data_dir = %config.system.data_dir.display(), "Running experiment");

    let ExperimentData {
        mut train_features,
        train_labels,
        mut test_features,
        test_labels,
    } = ExperimentData::load(source, &paths)?;

    if config.experiment.do_rsa {
        let encoder = RsaEncoder::new(config.rsa.clone())?;
        let mode = config.experiment.encoding_mode;
        train_features = encode_features(&encoder, mode, train_features.view())?;
        test_features = encode_features(&encoder, mode, test_features.view())?;
        info!(mode = mode.as_str(), features = train_features.ncols(), "Spike encoding applied");
    }

    if config.experiment.standardize {
        let (standardizer, train) = Standardizer::fit_transform(train_features.view())?;
        test_features = standardizer.transform(test_features.view())?;
        train_features = train;
    }

    let (model, search_scores) = if config.experiment.tune_hyperparams {
        let outcome = GridSearch::from_config(&config.search, &config.classifier)?
            .fit(train_features.view(), &train_labels)?;
        (outcome.best_model, Some(outcome.scores))
    } else {
        let mut model = KernelSvm::new(SvmParams::from_config(&config.classifier))?;
        model.fit(train_features.view(), &train_labels)?;
        (model, None)
    };

    let predictions = model.predict(test_features.view())?;
    let report = ClassificationReport::new(&test_labels, &predictions, &config.experiment.target_names)?;
    info!(classifier = %model.params(), accuracy = report.accuracy, "Experiment finished");

    Ok(ExperimentOutcome {
        kind,
        classifier: *model.params(),
        search_scores,
        predictions,
        test_labels,
        report,
    })
}
