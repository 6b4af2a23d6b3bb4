// ABOUTME: Ordinary least squares fit of y = a + b*x for baseline training
// ABOUTME: Reports intercept, slope, RMSE, and sample count; pure and stateless
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(clippy::cast_precision_loss)] // Safe: sample counts are far below 2^52

use formscore_core::constants::baseline::REGRESSION_MIN_POINTS;
use formscore_core::errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of fitting `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Intercept (`a`)
    pub intercept: f64,
    /// Slope (`b`)
    pub slope: f64,
    /// Root mean squared residual, `sqrt(SSE / n)`
    pub rmse: f64,
    /// Number of points fitted
    pub sample_count: usize,
}

impl LinearFit {
    /// Predicted `y` at `x`
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Reasons a fit cannot be produced from the given points
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// Fewer points than a line needs
    #[error("Insufficient data points for regression: need at least {needed}, got {got}")]
    InsufficientPoints {
        /// Minimum required
        needed: usize,
        /// Points supplied
        got: usize,
    },

    /// Every `x` is identical, so the slope is undefined
    #[error("Cannot calculate regression: zero variance in x")]
    ZeroVariance,

    /// A point contained NaN or infinity
    #[error("Non-finite value at sample {index}")]
    NonFinite {
        /// Offending position
        index: usize,
    },
}

impl From<RegressionError> for AppError {
    fn from(error: RegressionError) -> Self {
        Self::invalid_input(error.to_string()).with_source(error)
    }
}

/// Least squares fitting for baseline models
pub struct LinearRegression;

impl LinearRegression {
    /// Fit `y = a + b*x` over `(x, y)` points
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two points, any value is not
    /// finite, or all `x` values are equal
    pub fn fit(points: &[(f64, f64)]) -> Result<LinearFit, RegressionError> {
        if points.len() < REGRESSION_MIN_POINTS {
            return Err(RegressionError::InsufficientPoints {
                needed: REGRESSION_MIN_POINTS,
                got: points.len(),
            });
        }
        if let Some(index) = points
            .iter()
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(RegressionError::NonFinite { index });
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        // Centered sums avoid the cancellation the raw-sum formula suffers
        // with large predictors such as pace in seconds.
        let (sxx, sxy) = points.iter().fold((0.0_f64, 0.0_f64), |(sxx, sxy), (x, y)| {
            let dx = x - mean_x;
            (dx.mul_add(dx, sxx), dx.mul_add(y - mean_y, sxy))
        });

        if sxx.abs() <= f64::EPSILON * n * mean_x.abs().max(1.0) {
            return Err(RegressionError::ZeroVariance);
        }

        let slope = sxy / sxx;
        let intercept = slope.mul_add(-mean_x, mean_y);

        let sse = points
            .iter()
            .map(|(x, y)| {
                let residual = y - slope.mul_add(*x, intercept);
                residual * residual
            })
            .sum::<f64>();

        Ok(LinearFit {
            intercept,
            slope,
            rmse: (sse / n).sqrt(),
            sample_count: points.len(),
        })
    }
}
