// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Classification metrics: confusion matrix, per-class precision / recall /
//! F1 / support, weighted averages and accuracy

use std::fmt;

use ndarray::{Array2, Axis};

use crate::error::{PipelineError, Result};

const AVERAGE_LABEL: &str = "avg / total";

fn check_lengths(y_true: &[usize], y_pred: &[usize]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::shape("predictions", y_true.len(), y_pred.len()));
    }
    if y_true.is_empty() {
        return Err(PipelineError::EmptyDataset("no predictions to score".to_string()));
    }
    Ok(())
}

/// Fraction of predictions equal to the true label
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Counts indexed by (true class, predicted class)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    /// At least `n_classes` wide, widened to fit every label seen
    pub fn new(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Result<Self> {
        check_lengths(y_true, y_pred)?;
        let seen = y_true.iter().chain(y_pred).max().map_or(0, |&max| max + 1);
        let size = n_classes.max(seen);

        let mut counts = Array2::zeros((size, size));
        for (&t, &p) in y_true.iter().zip(y_pred) {
            counts[[t, p]] += 1;
        }
        Ok(Self { counts })
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    pub fn n_classes(&self) -> usize {
        self.counts.nrows()
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    pub fn correct(&self) -> usize {
        self.counts.diag().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .map(|count| count.to_string().len())
            .max()
            .unwrap_or(1);
        for row in self.counts.rows() {
            let cells: Vec<String> = row.iter().map(|c| format!("{:>width$}", c, width = width)).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Scores of one class (or of the weighted average)
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Per-class report with support-weighted averages
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub average: ClassMetrics,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

impl ClassificationReport {
    /// Classes beyond `target_names` are reported as `class <index>`
    pub fn new(y_true: &[usize], y_pred: &[usize], target_names: &[String]) -> Result<Self> {
        let confusion = ConfusionMatrix::new(y_true, y_pred, target_names.len())?;
        let counts = confusion.counts();
        let predicted_totals = counts.sum_axis(Axis(0));
        let true_totals = counts.sum_axis(Axis(1));

        let classes: Vec<ClassMetrics> = (0..confusion.n_classes())
            .map(|class| {
                let hits = counts[[class, class]];
                let precision = ratio(hits, predicted_totals[class]);
                let recall = ratio(hits, true_totals[class]);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    name: target_names
                        .get(class)
                        .cloned()
                        .unwrap_or_else(|| format!("class {}", class)),
                    precision,
                    recall,
                    f1,
                    support: true_totals[class],
                }
            })
            .collect();

        let total = confusion.total();
        let weighted = |metric: fn(&ClassMetrics) -> f64| {
            classes
                .iter()
                .map(|c| metric(c) * c.support as f64)
                .sum::<f64>()
                / total as f64
        };
        let average = ClassMetrics {
            name: AVERAGE_LABEL.to_string(),
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: total,
        };

        Ok(Self {
            accuracy: ratio(confusion.correct(), total),
            classes,
            average,
            confusion,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .classes
            .iter()
            .map(|c| c.name.len())
            .chain(std::iter::once(AVERAGE_LABEL.len()))
            .max()
            .unwrap_or(AVERAGE_LABEL.len());

        writeln!(
            f,
            "{:>name_width$} {:>9} {:>9} {:>9} {:>9}",
            "",
            "precision",
            "recall",
            "f1-score",
            "support",
            name_width = name_width
        )?;
        writeln!(f)?;

        let line = |f: &mut fmt::Formatter<'_>, m: &ClassMetrics| {
            writeln!(
                f,
                "{:>name_width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.name,
                m.precision,
                m.recall,
                m.f1,
                m.support,
                name_width = name_width
            )
        };
        for class in &self.classes {
            line(f, class)?;
        }
        writeln!(f)?;
        line(f, &self.average)
    }
}
