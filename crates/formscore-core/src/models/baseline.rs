// ABOUTME: Training samples and versioned baseline records
// ABOUTME: BaselineRecord rows are append-only; each training run inserts a new one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ConditionGroup, MetricKind};

/// One observation used for training, as returned by the datastore
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Condition group the observation was recorded under
    pub condition_group: ConditionGroup,
    /// When the observation was recorded
    pub timestamp: DateTime<Utc>,
    /// Predictor value (pace, power per kg)
    pub independent_value: f64,
    /// Measured metric value
    pub dependent_value: f64,
}

/// A fitted `dependent = coef_a + coef_b * independent` model for one
/// (user, condition group, metric) key and one training window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    /// Row identity
    pub id: Uuid,
    /// Owner of the baseline
    pub user_id: String,
    /// Condition group the samples came from
    pub condition_group: ConditionGroup,
    /// Metric this baseline predicts
    pub metric: MetricKind,
    /// Intercept
    pub coef_a: f64,
    /// Slope
    pub coef_b: f64,
    /// Root mean squared residual of the fit
    pub rmse: f64,
    /// Number of samples the fit used
    pub sample_count: usize,
    /// First day of the training window (inclusive)
    pub period_start: NaiveDate,
    /// Last day of the training window (inclusive)
    pub period_end: NaiveDate,
    /// Insertion time
    pub created_at: DateTime<Utc>,
}

impl BaselineRecord {
    /// Expected metric value for the given predictor value
    #[must_use]
    pub fn predict(&self, independent_value: f64) -> f64 {
        self.coef_b.mul_add(independent_value, self.coef_a)
    }

    /// Whether this baseline may be used for an evaluation as of `as_of`
    #[must_use]
    pub fn is_available_at(&self, as_of: NaiveDate) -> bool {
        self.period_end <= as_of
    }
}
