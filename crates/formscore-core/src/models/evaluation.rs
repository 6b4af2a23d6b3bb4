// ABOUTME: Per-metric evaluation results, star ratings, and persisted evaluation records
// ABOUTME: Missing measurements are represented as "not evaluated" results, never as errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ConditionGroup, MetricKind, TrainingMode};

/// Five-tier rating of a sign-normalized deviation score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// 1/5
    Worst,
    /// 2/5
    Poor,
    /// 3/5
    Neutral,
    /// 4/5
    Good,
    /// 5/5
    Best,
}

impl Rating {
    /// Star count, 1 (worst) to 5 (best)
    #[must_use]
    pub const fn stars(self) -> u8 {
        match self {
            Self::Worst => 1,
            Self::Poor => 2,
            Self::Neutral => 3,
            Self::Good => 4,
            Self::Best => 5,
        }
    }

    /// Lowercase label used in reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Worst => "worst",
            Self::Poor => "poor",
            Self::Neutral => "neutral",
            Self::Good => "good",
            Self::Best => "best",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/5)", self.label(), self.stars())
    }
}

/// Outcome of evaluating one metric of one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Metric evaluated
    pub metric: MetricKind,
    /// Measured value for the activity
    pub actual: Option<f64>,
    /// Baseline prediction for the activity
    pub expected: Option<f64>,
    /// Sign-normalized relative deviation; negative is better than expected
    pub deviation_score: Option<f64>,
    /// Tier of `deviation_score`
    pub rating: Option<Rating>,
    /// Baseline row the expectation came from
    pub baseline_id: Option<Uuid>,
}

impl EvaluationResult {
    /// A fully evaluated metric
    #[must_use]
    pub fn evaluated(
        metric: MetricKind,
        actual: f64,
        expected: f64,
        deviation_score: f64,
        rating: Rating,
        baseline_id: Uuid,
    ) -> Self {
        Self {
            metric,
            actual: Some(actual),
            expected: Some(expected),
            deviation_score: Some(deviation_score),
            rating: Some(rating),
            baseline_id: Some(baseline_id),
        }
    }

    /// Placeholder for a metric whose data or baseline was unavailable
    #[must_use]
    pub const fn not_evaluated(metric: MetricKind) -> Self {
        Self {
            metric,
            actual: None,
            expected: None,
            deviation_score: None,
            rating: None,
            baseline_id: None,
        }
    }

    /// Whether a deviation score was produced
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.deviation_score.is_some()
    }
}

/// Identity and conditions of an activity, as known to the datastore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityContext {
    /// Activity identifier
    pub activity_id: String,
    /// Owner of the activity
    pub user_id: String,
    /// Condition group the activity was run under
    pub condition_group: ConditionGroup,
    /// Start time of the activity
    pub started_at: DateTime<Utc>,
}

/// Persisted evaluation of one activity, upserted by activity id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Activity identifier (upsert key)
    pub activity_id: String,
    /// Owner of the activity
    pub user_id: String,
    /// Condition group used for baseline lookup
    pub condition_group: ConditionGroup,
    /// Per-metric results, one per catalogue metric
    pub results: Vec<EvaluationResult>,
    /// Weighted composite score; absent when no slot metric was evaluated
    pub integrated_score: Option<f64>,
    /// Mode whose weight profile was applied
    pub training_mode: TrainingMode,
    /// True when the raw training-type label was absent or unmapped
    pub mode_fallback: bool,
    /// Date baselines were resolved against
    pub as_of: NaiveDate,
    /// When this record was computed
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationRecord {
    /// Result for a specific metric, if present
    #[must_use]
    pub fn result_for(&self, metric: MetricKind) -> Option<&EvaluationResult> {
        self.results.iter().find(|r| r.metric == metric)
    }

    /// Metrics that could not be evaluated
    #[must_use]
    pub fn not_evaluated(&self) -> Vec<MetricKind> {
        self.results
            .iter()
            .filter(|r| !r.is_evaluated())
            .map(|r| r.metric)
            .collect()
    }
}
