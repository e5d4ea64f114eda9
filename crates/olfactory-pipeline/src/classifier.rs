// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Kernel support vector classifier
//!
//! One-vs-rest wrapper around smartcore's binary `SVC`. Each class gets its
//! own machine trained on `+1` (the class) against `-1` (everything else);
//! prediction picks the class with the largest decision value.
//!
//! A smartcore `SVC` borrows its parameters and its prediction input for
//! the same lifetime, so fitted machines are never stored. [`KernelSvm::fit`]
//! validates and keeps the training set; the binary machines are trained and
//! evaluated together in [`KernelSvm::decision_function`], in parallel over
//! classes.

use std::fmt;

use ndarray::{Array2, ArrayView2, Axis};
use olfactory_config::{ClassifierConfig, KernelKind};
use rayon::prelude::*;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::svm::svc::{SVCParameters, SVC};
use smartcore::svm::Kernels;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Supervised multi-class classifier over feature rows
pub trait Classifier {
    fn fit(&mut self, features: ArrayView2<f64>, labels: &[usize]) -> Result<()>;

    fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<usize>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    Linear,
    /// `exp(-gamma * |x - z|^2)`; `None` resolves to `1 / n_features` at fit
    Rbf { gamma: Option<f64> },
}

impl Kernel {
    fn resolve(self, n_features: usize) -> ResolvedKernel {
        match self {
            Kernel::Linear => ResolvedKernel::Linear,
            Kernel::Rbf { gamma } => ResolvedKernel::Rbf {
                gamma: gamma.unwrap_or(1.0 / n_features.max(1) as f64),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ResolvedKernel {
    Linear,
    Rbf { gamma: f64 },
}

type SvcParameters = SVCParameters<f64, i32, DenseMatrix<f64>, Vec<i32>>;

impl ResolvedKernel {
    fn svc_parameters(self, c: f64, seed: u64) -> SvcParameters {
        let parameters: SvcParameters = SVCParameters::default().with_c(c).with_seed(Some(seed));
        match self {
            ResolvedKernel::Linear => parameters.with_kernel(Kernels::linear()),
            ResolvedKernel::Rbf { gamma } => parameters.with_kernel(Kernels::rbf().with_gamma(gamma)),
        }
    }
}

/// Hyperparameters of one [`KernelSvm`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmParams {
    pub kernel: Kernel,
    pub c: f64,
    /// Solver seed; class `k` trains with `seed + k`
    pub seed: u64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl SvmParams {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let kernel = match config.kernel {
            KernelKind::Linear => Kernel::Linear,
            KernelKind::Rbf => Kernel::Rbf {
                gamma: config.gamma,
            },
        };
        Self {
            kernel,
            c: config.c,
            seed: config.seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.c.is_finite() || self.c <= 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "C must be a positive finite number, got {}",
                self.c
            )));
        }
        if let Kernel::Rbf { gamma: Some(gamma) } = self.kernel {
            if !gamma.is_finite() || gamma <= 0.0 {
                return Err(PipelineError::InvalidParameter(format!(
                    "gamma must be a positive finite number, got {}",
                    gamma
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SvmParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kernel {
            Kernel::Linear => write!(f, "SVC(kernel=linear, C={})", self.c),
            Kernel::Rbf { gamma: Some(gamma) } => {
                write!(f, "SVC(kernel=rbf, C={}, gamma={})", self.c, gamma)
            }
            Kernel::Rbf { gamma: None } => write!(f, "SVC(kernel=rbf, C={}, gamma=auto)", self.c),
        }
    }
}

#[derive(Debug, Clone)]
struct TrainingSet {
    kernel: ResolvedKernel,
    features: Array2<f64>,
    labels: Vec<usize>,
    classes: Vec<usize>,
}

/// One-vs-rest kernel SVM
#[derive(Debug, Clone)]
pub struct KernelSvm {
    params: SvmParams,
    training: Option<TrainingSet>,
}

impl KernelSvm {
    pub fn new(params: SvmParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            training: None,
        })
    }

    pub fn params(&self) -> &SvmParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.training.is_some()
    }

    /// Classes seen during fit, in ascending order
    pub fn classes(&self) -> Option<&[usize]> {
        self.training.as_ref().map(|training| training.classes.as_slice())
    }

    /// Decision value of every class for every row, shape (rows, classes)
    pub fn decision_function(&self, features: ArrayView2<f64>) -> Result<Array2<f64>> {
        let training = self.training.as_ref().ok_or(PipelineError::NotFitted)?;
        if features.ncols() != training.features.ncols() {
            return Err(PipelineError::shape(
                "classifier features",
                training.features.ncols(),
                features.ncols(),
            ));
        }

        let rows = features.nrows();
        let classes = training.classes.len();
        if rows == 0 {
            return Ok(Array2::zeros((0, classes)));
        }
        if classes == 1 {
            return Ok(Array2::ones((rows, 1)));
        }

        let columns: Vec<Vec<f64>> = training
            .classes
            .par_iter()
            .map(|&class| self.one_vs_rest(training, class, features))
            .collect::<Result<_>>()?;

        let mut decision = Array2::zeros((rows, classes));
        for (mut column, values) in decision.axis_iter_mut(Axis(1)).zip(columns) {
            for (cell, value) in column.iter_mut().zip(values) {
                *cell = value;
            }
        }
        Ok(decision)
    }

    /// Train the `class` vs rest machine and score `features` with it
    fn one_vs_rest(&self, training: &TrainingSet, class: usize, features: ArrayView2<f64>) -> Result<Vec<f64>> {
        let x = dense(training.features.view())?;
        let queries = dense(features)?;
        let y: Vec<i32> = training
            .labels
            .iter()
            .map(|&label| if label == class { 1 } else { -1 })
            .collect();
        let parameters = training
            .kernel
            .svc_parameters(self.params.c, self.params.seed.wrapping_add(class as u64));

        let machine = SVC::fit(&x, &y, &parameters)
            .map_err(|e| PipelineError::Classifier(format!("class {}: {:?}", class, e)))?;

        machine
            .decision_function(&queries)
            .map_err(|e| PipelineError::Classifier(format!("class {}: {:?}", class, e)))
    }
}

fn dense(features: ArrayView2<f64>) -> Result<DenseMatrix<f64>> {
    let rows: Vec<Vec<f64>> = features.rows().into_iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
        .map_err(|e| PipelineError::Classifier(format!("failed to build feature matrix: {:?}", e)))
}

impl Classifier for KernelSvm {
    fn fit(&mut self, features: ArrayView2<f64>, labels: &[usize]) -> Result<()> {
        let n = features.nrows();
        if n == 0 || features.ncols() == 0 {
            return Err(PipelineError::EmptyDataset(
                "cannot fit a classifier without samples".to_string(),
            ));
        }
        if labels.len() != n {
            return Err(PipelineError::shape("classifier labels", n, labels.len()));
        }

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();

        debug!(
            params = %self.params,
            samples = n,
            classes = classes.len(),
            "Kernel SVM training set accepted"
        );

        self.training = Some(TrainingSet {
            kernel: self.params.kernel.resolve(features.ncols()),
            features: features.to_owned(),
            labels: labels.to_vec(),
            classes,
        });
        Ok(())
    }

    fn predict(&self, features: ArrayView2<f64>) -> Result<Vec<usize>> {
        let decision = self.decision_function(features)?;
        let classes = self.classes().ok_or(PipelineError::NotFitted)?;

        Ok(decision
            .rows()
            .into_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |(best, best_value), (index, &value)| {
                        if value > best_value {
                            (index, value)
                        } else {
                            (best, best_value)
                        }
                    })
                    .0;
                classes[best]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Three tight, well separated clusters of five points each
    fn clusters() -> (Array2<f64>, Vec<usize>) {
        let centers = [(0.0, 5.0), (-5.0, -3.0), (5.0, -3.0)];
        let offsets = [(0.0, 0.0), (0.3, 0.1), (-0.2, 0.3), (0.1, -0.3), (-0.3, -0.2)];
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (class, (cx, cy)) in centers.iter().enumerate() {
            for (dx, dy) in offsets {
                rows.push(cx + dx);
                rows.push(cy + dy);
                labels.push(class);
            }
        }
        (Array2::from_shape_vec((labels.len(), 2), rows).unwrap(), labels)
    }

    fn params(kernel: Kernel, c: f64) -> SvmParams {
        SvmParams { kernel, c, seed: 3 }
    }

    #[test]
    fn test_linear_kernel_separates_clusters() {
        let (x, y) = clusters();
        let mut svm = KernelSvm::new(params(Kernel::Linear, 10.0)).unwrap();
        svm.fit(x.view(), &y).unwrap();

        assert_eq!(svm.predict(x.view()).unwrap(), y);
        assert_eq!(svm.classes(), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn test_rbf_kernel_separates_clusters() {
        let (x, y) = clusters();
        let mut svm = KernelSvm::new(params(Kernel::Rbf { gamma: None }, 100.0)).unwrap();
        svm.fit(x.view(), &y).unwrap();

        let queries = array![[0.1, 4.9], [-4.9, -3.1], [5.2, -2.8]];
        assert_eq!(svm.predict(queries.view()).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_decision_values_are_repeatable() {
        let (x, y) = clusters();
        let mut first = KernelSvm::new(params(Kernel::Linear, 1.0)).unwrap();
        let mut second = first.clone();
        first.fit(x.view(), &y).unwrap();
        second.fit(x.view(), &y).unwrap();

        let decision = first.decision_function(x.view()).unwrap();
        assert_eq!(decision.dim(), (15, 3));
        assert_eq!(decision, second.decision_function(x.view()).unwrap());
        assert_eq!(decision, first.decision_function(x.view()).unwrap());
    }

    #[test]
    fn test_sparse_labels_map_back_to_original_classes() {
        let x = array![[-3.0], [-2.5], [2.5], [3.0]];
        let y = vec![4, 4, 7, 7];
        let mut svm = KernelSvm::new(params(Kernel::Linear, 10.0)).unwrap();
        svm.fit(x.view(), &y).unwrap();
        assert_eq!(svm.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn test_single_class_predicts_that_class() {
        let x = array![[0.0, 1.0], [1.0, 0.0]];
        let mut svm = KernelSvm::new(SvmParams::default()).unwrap();
        svm.fit(x.view(), &[2, 2]).unwrap();
        assert_eq!(svm.predict(array![[5.0, 5.0]].view()).unwrap(), vec![2]);
    }

    #[test]
    fn test_no_rows_predicts_nothing() {
        let (x, y) = clusters();
        let mut svm = KernelSvm::new(params(Kernel::Linear, 1.0)).unwrap();
        svm.fit(x.view(), &y).unwrap();
        assert!(svm.predict(Array2::<f64>::zeros((0, 2)).view()).unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        let svm = KernelSvm::new(SvmParams::default()).unwrap();
        assert!(matches!(
            svm.predict(array![[1.0]].view()),
            Err(PipelineError::NotFitted)
        ));

        let mut svm = svm;
        svm.fit(array![[1.0, 2.0], [2.0, 1.0]].view(), &[0, 1]).unwrap();
        assert!(matches!(
            svm.predict(array![[1.0]].view()),
            Err(PipelineError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));

        assert!(matches!(
            svm.fit(array![[1.0]].view(), &[0, 1]),
            Err(PipelineError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            svm.fit(Array2::<f64>::zeros((0, 2)).view(), &[]),
            Err(PipelineError::EmptyDataset(_))
        ));

        assert!(KernelSvm::new(SvmParams {
            c: 0.0,
            ..SvmParams::default()
        })
        .is_err());
        assert!(KernelSvm::new(SvmParams {
            kernel: Kernel::Rbf { gamma: Some(-1.0) },
            ..SvmParams::default()
        })
        .is_err());
    }

    #[test]
    fn test_display_names_kernel() {
        assert_eq!(
            params(Kernel::Rbf { gamma: Some(0.1) }, 10.0).to_string(),
            "SVC(kernel=rbf, C=10, gamma=0.1)"
        );
        assert_eq!(params(Kernel::Linear, 1.0).to_string(), "SVC(kernel=linear, C=1)");
    }
}
