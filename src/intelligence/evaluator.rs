// ABOUTME: Evaluator comparing one activity's measurement against the baseline available as of a date
// ABOUTME: Missing baselines or measurements yield "not evaluated", never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use chrono::NaiveDate;
use formscore_core::models::{ActivityContext, EvaluationResult, MetricKind};
use formscore_intelligence::config::RatingThresholds;
use formscore_intelligence::{DeviationRater, EngineConfig};
use tracing::{debug, warn};

use crate::database::PerformanceDataStore;
use crate::errors::{AppError, AppResult};

/// Rates activity measurements against trained baselines
pub struct Evaluator {
    store: Arc<dyn PerformanceDataStore>,
    rater: DeviationRater,
}

impl Evaluator {
    /// Create an evaluator with explicit rating thresholds
    #[must_use]
    pub fn new(store: Arc<dyn PerformanceDataStore>, thresholds: RatingThresholds) -> Self {
        Self {
            store,
            rater: DeviationRater::new(thresholds),
        }
    }

    /// Create an evaluator using the global engine configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the environment overrides are invalid
    pub fn with_global_config(store: Arc<dyn PerformanceDataStore>) -> AppResult<Self> {
        Ok(Self::new(store, EngineConfig::try_global()?.rating))
    }

    /// Rater in use
    #[must_use]
    pub const fn rater(&self) -> &DeviationRater {
        &self.rater
    }

    /// Evaluate one metric of one activity as of `as_of`
    ///
    /// Returns `Ok(None)` when no baseline with `period_end <= as_of` exists,
    /// when the activity lacks the metric's measured or predictor value, or
    /// when the baseline predicts zero.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown activity and propagates
    /// datastore failures
    pub async fn evaluate(
        &self,
        activity_id: &str,
        metric: MetricKind,
        as_of: NaiveDate,
    ) -> AppResult<Option<EvaluationResult>> {
        let context = self
            .store
            .get_activity_context(activity_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Activity {activity_id}")))?;
        self.evaluate_in_context(&context, metric, as_of).await
    }

    /// [`evaluate`](Self::evaluate) for an activity whose context is already loaded
    ///
    /// # Errors
    ///
    /// Propagates datastore failures
    pub async fn evaluate_in_context(
        &self,
        context: &ActivityContext,
        metric: MetricKind,
        as_of: NaiveDate,
    ) -> AppResult<Option<EvaluationResult>> {
        let activity_id = context.activity_id.as_str();

        let Some(baseline) = self
            .store
            .get_latest_baseline(&context.user_id, context.condition_group, metric, as_of)
            .await?
        else {
            debug!(
                activity_id,
                metric = %metric,
                condition_group = %context.condition_group,
                %as_of,
                "No baseline available, metric not evaluated"
            );
            return Ok(None);
        };

        let Some(actual) = self
            .store
            .query_activity_measurement(activity_id, metric)
            .await?
        else {
            debug!(activity_id, metric = %metric, "No measurement, metric not evaluated");
            return Ok(None);
        };

        let Some(independent) = self
            .store
            .query_activity_independent_value(activity_id, metric)
            .await?
        else {
            debug!(
                activity_id,
                metric = %metric,
                independent_variable = ?metric.independent_variable(),
                "No predictor value, metric not evaluated"
            );
            return Ok(None);
        };

        let expected = baseline.predict(independent);
        let Some((deviation_score, rating)) =
            self.rater.assess(actual, expected, metric.polarity())
        else {
            warn!(
                activity_id,
                metric = %metric,
                baseline_id = %baseline.id,
                actual,
                expected,
                "Baseline expectation is zero or not finite, metric not evaluated"
            );
            return Ok(None);
        };

        debug!(
            activity_id,
            metric = %metric,
            baseline_id = %baseline.id,
            actual,
            expected,
            deviation_score,
            rating = %rating,
            "Metric evaluated"
        );
        Ok(Some(EvaluationResult::evaluated(
            metric,
            actual,
            expected,
            deviation_score,
            rating,
            baseline.id,
        )))
    }
}
