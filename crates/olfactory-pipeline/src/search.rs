// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hyperparameter search with stratified k-fold cross-validation

use std::collections::BTreeMap;

use ndarray::{ArrayView2, Axis};
use olfactory_config::{ClassifierConfig, SearchConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::classifier::{Classifier, Kernel, KernelSvm, SvmParams};
use crate::error::{PipelineError, Result};
use crate::report::accuracy;

/// Train/validation indices of one fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Stratified k-fold splits
///
/// Samples of each class (optionally shuffled) are dealt round-robin across
/// the folds, continuing from where the previous class stopped, so every
/// fold keeps roughly the class proportions of the whole set.
pub fn stratified_k_fold(labels: &[usize], folds: usize, shuffle: bool, seed: u64) -> Result<Vec<FoldSplit>> {
    if folds < 2 {
        return Err(PipelineError::InvalidParameter(format!(
            "at least 2 folds are required, got {}",
            folds
        )));
    }
    if labels.len() < folds {
        return Err(PipelineError::InvalidParameter(format!(
            "{} folds requested but only {} samples available",
            folds,
            labels.len()
        )));
    }

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(index);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut fold_of = vec![0; labels.len()];
    let mut next_fold = 0;
    for indices in by_class.values_mut() {
        if shuffle {
            indices.shuffle(&mut rng);
        }
        for &index in indices.iter() {
            fold_of[index] = next_fold;
            next_fold = (next_fold + 1) % folds;
        }
    }

    Ok((0..folds)
        .map(|fold| {
            let (test_indices, train_indices): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&i| fold_of[i] == fold);
            FoldSplit {
                train_indices,
                test_indices,
            }
        })
        .collect())
}

/// Candidate list: every RBF gamma with every C, then linear with every C
pub fn parameter_grid(search: &SearchConfig, base: &ClassifierConfig) -> Vec<SvmParams> {
    let template = SvmParams::from_config(base);
    let rbf = search.rbf_gammas.iter().flat_map(move |&gamma| {
        search.c_values.iter().map(move |&c| SvmParams {
            kernel: Kernel::Rbf { gamma: Some(gamma) },
            c,
            ..template
        })
    });
    let linear = search
        .c_values
        .iter()
        .filter(|_| search.include_linear)
        .map(|&c| SvmParams {
            kernel: Kernel::Linear,
            c,
            ..template
        });
    rbf.chain(linear).collect()
}

/// Mean validation accuracy of one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub params: SvmParams,
    pub mean_accuracy: f64,
    pub fold_accuracies: Vec<f64>,
}

/// Result of a grid search; `best_model` is refit on all training data
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_params: SvmParams,
    pub best_score: f64,
    pub scores: Vec<CandidateScore>,
    pub best_model: KernelSvm,
}

/// Exhaustive search over [`SvmParams`] candidates
#[derive(Debug, Clone)]
pub struct GridSearch {
    candidates: Vec<SvmParams>,
    folds: usize,
    shuffle: bool,
    seed: u64,
}

impl GridSearch {
    pub fn new(candidates: Vec<SvmParams>, folds: usize, shuffle: bool, seed: u64) -> Result<Self> {
        if candidates.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "parameter grid is empty".to_string(),
            ));
        }
        for candidate in &candidates {
            candidate.validate()?;
        }
        Ok(Self {
            candidates,
            folds,
            shuffle,
            seed,
        })
    }

    pub fn from_config(search: &SearchConfig, base: &ClassifierConfig) -> Result<Self> {
        Self::new(
            parameter_grid(search, base),
            search.folds,
            search.shuffle,
            search.seed,
        )
    }

    pub fn candidates(&self) -> &[SvmParams] {
        &self.candidates
    }

    pub fn fit(&self, features: ArrayView2<f64>, labels: &[usize]) -> Result<SearchOutcome> {
        if labels.len() != features.nrows() {
            return Err(PipelineError::shape(
                "search labels",
                features.nrows(),
                labels.len(),
            ));
        }
        let splits = stratified_k_fold(labels, self.folds, self.shuffle, self.seed)?;

        info!(
            candidates = self.candidates.len(),
            folds = self.folds,
            samples = labels.len(),
            "Starting grid search"
        );

        let scores = self
            .candidates
            .par_iter()
            .map(|&params| score_candidate(params, features, labels, &splits))
            .collect::<Result<Vec<_>>>()?;

        let mut best = 0;
        for (index, score) in scores.iter().enumerate() {
            debug!(params = %score.params, mean_accuracy = score.mean_accuracy, "Candidate scored");
            if score.mean_accuracy > scores[best].mean_accuracy {
                best = index;
            }
        }

        let best_params = scores[best].params;
        let best_score = scores[best].mean_accuracy;
        let mut best_model = KernelSvm::new(best_params)?;
        best_model.fit(features, labels)?;

        info!(best = %best_params, score = best_score, "Grid search finished");

        Ok(SearchOutcome {
            best_params,
            best_score,
            scores,
            best_model,
        })
    }
}

fn score_candidate(
    params: SvmParams,
    features: ArrayView2<f64>,
    labels: &[usize],
    splits: &[FoldSplit],
) -> Result<CandidateScore> {
    let mut fold_accuracies = Vec::with_capacity(splits.len());
    for split in splits {
        let train = features.select(Axis(0), &split.train_indices);
        let train_labels: Vec<usize> = split.train_indices.iter().map(|&i| labels[i]).collect();
        let test = features.select(Axis(0), &split.test_indices);
        let test_labels: Vec<usize> = split.test_indices.iter().map(|&i| labels[i]).collect();

        let mut model = KernelSvm::new(params)?;
        model.fit(train.view(), &train_labels)?;
        let predicted = model.predict(test.view())?;
        fold_accuracies.push(accuracy(&test_labels, &predicted)?);
    }

    let mean_accuracy = fold_accuracies.iter().sum::<f64>() / fold_accuracies.len() as f64;
    Ok(CandidateScore {
        params,
        mean_accuracy,
        fold_accuracies,
    })
}
