// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-column zero mean / unit variance scaling

use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use tracing::warn;

use crate::error::{PipelineError, Result};

/// Fitted column statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

/// A column whose deviation is within rounding noise of its mean is constant
fn is_constant(std: f64, mean: f64) -> bool {
    std <= 10.0 * f64::EPSILON * mean.abs().max(1.0)
}

impl Standardizer {
    /// Column means and population standard deviations
    pub fn fit(features: ArrayView2<f64>) -> Result<Self> {
        let mean = features
            .mean_axis(Axis(0))
            .filter(|_| features.ncols() > 0)
            .ok_or_else(|| PipelineError::EmptyDataset("cannot standardize an empty matrix".to_string()))?;

        let mut scale = features.std_axis(Axis(0), 0.0);
        let mut constant_columns = 0;
        Zip::from(&mut scale).and(&mean).for_each(|s, &m| {
            if is_constant(*s, m) {
                *s = 1.0;
                constant_columns += 1;
            }
        });
        if constant_columns > 0 {
            warn!(constant_columns, "Zero-variance columns are centered but not scaled");
        }

        Ok(Self { mean, scale })
    }

    pub fn transform(&self, features: ArrayView2<f64>) -> Result<Array2<f64>> {
        if features.ncols() != self.mean.len() {
            return Err(PipelineError::shape(
                "standardizer columns",
                self.mean.len(),
                features.ncols(),
            ));
        }
        Ok((&features - &self.mean) / &self.scale)
    }

    pub fn fit_transform(features: ArrayView2<f64>) -> Result<(Self, Array2<f64>)> {
        let standardizer = Self::fit(features)?;
        let transformed = standardizer.transform(features)?;
        Ok((standardizer, transformed))
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}
