// ABOUTME: Baseline Trainer fitting rolling-window regressions into append-only baseline rows
// ABOUTME: Insufficient or degenerate data yields no baseline rather than an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use formscore_core::models::{BaselineRecord, ConditionGroup, MetricKind};
use formscore_intelligence::config::BaselineConfig;
use formscore_intelligence::{EngineConfig, LinearRegression, RegressionError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::PerformanceDataStore;
use crate::errors::{AppError, AppResult};

/// Why a training run produced no baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    /// Fewer samples in the window than the configured minimum
    InsufficientSamples {
        /// Samples found
        found: usize,
        /// Samples required
        required: usize,
    },
    /// Every sample had the same independent value
    DegenerateFit,
}

/// Result of one training run
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingOutcome {
    /// A new baseline row was inserted
    Trained(BaselineRecord),
    /// Nothing was inserted
    Skipped {
        /// Metric that was skipped
        metric: MetricKind,
        /// Why
        reason: SkipReason,
    },
}

impl TrainingOutcome {
    /// The inserted baseline, if any
    #[must_use]
    pub fn into_baseline(self) -> Option<BaselineRecord> {
        match self {
            Self::Trained(record) => Some(record),
            Self::Skipped { .. } => None,
        }
    }
}

/// Fits per-user, per-condition baselines and appends them to the datastore
pub struct BaselineTrainer {
    store: Arc<dyn PerformanceDataStore>,
    config: BaselineConfig,
}

impl BaselineTrainer {
    /// Create a trainer with explicit configuration
    #[must_use]
    pub fn new(store: Arc<dyn PerformanceDataStore>, config: BaselineConfig) -> Self {
        Self { store, config }
    }

    /// Create a trainer using the global engine configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the environment overrides are invalid
    pub fn with_global_config(store: Arc<dyn PerformanceDataStore>) -> AppResult<Self> {
        let config = EngineConfig::try_global()?;
        Ok(Self::new(store, config.baseline.clone()))
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// Inclusive `[end - window_months, end]` training window
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero-length window, or if the
    /// start date falls outside the supported calendar
    pub fn window_bounds(window_months: u32, end_date: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
        if window_months == 0 {
            return Err(AppError::config("Training window must be at least one month"));
        }
        let start = end_date
            .checked_sub_months(Months::new(window_months))
            .ok_or_else(|| {
                AppError::config(format!(
                    "Training window of {window_months} months before {end_date} is out of range"
                ))
            })?;
        Ok((start, end_date))
    }

    /// Fit and store a new baseline for one key
    ///
    /// Returns `Ok(None)` when the window holds too few samples or the fit is
    /// degenerate; neither is an error.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty user id or zero window, and
    /// propagates datastore failures unchanged
    pub async fn train(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        window_months: u32,
        end_date: NaiveDate,
    ) -> AppResult<Option<BaselineRecord>> {
        Ok(self
            .train_with_outcome(user_id, condition_group, metric, window_months, end_date)
            .await?
            .into_baseline())
    }

    /// [`train`](Self::train) taking identifiers as strings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `condition_group` is empty or unknown,
    /// or `metric` is not a known metric identifier
    pub async fn train_by_name(
        &self,
        user_id: &str,
        condition_group: &str,
        metric: &str,
        window_months: u32,
        end_date: NaiveDate,
    ) -> AppResult<Option<BaselineRecord>> {
        let condition_group: ConditionGroup = condition_group.parse()?;
        let metric: MetricKind = metric.parse()?;
        self.train(user_id, condition_group, metric, window_months, end_date)
            .await
    }

    /// Train every metric for one user and condition group over the configured window
    ///
    /// # Errors
    ///
    /// Stops at the first configuration or datastore error
    pub async fn train_all(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metrics: &[MetricKind],
        end_date: NaiveDate,
    ) -> AppResult<Vec<TrainingOutcome>> {
        let mut outcomes = Vec::with_capacity(metrics.len());
        for metric in metrics {
            outcomes.push(
                self.train_with_outcome(
                    user_id,
                    condition_group,
                    *metric,
                    self.config.window_months,
                    end_date,
                )
                .await?,
            );
        }
        Ok(outcomes)
    }

    async fn train_with_outcome(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        window_months: u32,
        end_date: NaiveDate,
    ) -> AppResult<TrainingOutcome> {
        if user_id.trim().is_empty() {
            return Err(AppError::missing_field("user_id"));
        }
        let (period_start, period_end) = Self::window_bounds(window_months, end_date)?;

        let samples = self
            .store
            .query_samples(user_id, condition_group, metric, period_start, period_end)
            .await?;

        if samples.len() < self.config.min_samples {
            info!(
                user_id = %user_id,
                condition_group = %condition_group,
                metric = %metric,
                sample_count = samples.len(),
                min_samples = self.config.min_samples,
                "Insufficient samples for baseline, skipping"
            );
            return Ok(TrainingOutcome::Skipped {
                metric,
                reason: SkipReason::InsufficientSamples {
                    found: samples.len(),
                    required: self.config.min_samples,
                },
            });
        }

        let points: Vec<(f64, f64)> = samples
            .iter()
            .map(|s| (s.independent_value, s.dependent_value))
            .collect();

        let fit = match LinearRegression::fit(&points) {
            Ok(fit) => fit,
            Err(RegressionError::ZeroVariance) => {
                warn!(
                    user_id = %user_id,
                    condition_group = %condition_group,
                    metric = %metric,
                    sample_count = samples.len(),
                    "Independent variable has no variance, baseline not trained"
                );
                return Ok(TrainingOutcome::Skipped {
                    metric,
                    reason: SkipReason::DegenerateFit,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let record = BaselineRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            condition_group,
            metric,
            coef_a: fit.intercept,
            coef_b: fit.slope,
            rmse: fit.rmse,
            sample_count: fit.sample_count,
            period_start,
            period_end,
            created_at: Utc::now(),
        };
        self.store.insert_baseline(&record).await?;

        info!(
            user_id = %user_id,
            condition_group = %condition_group,
            metric = %metric,
            baseline_id = %record.id,
            sample_count = record.sample_count,
            coef_a = record.coef_a,
            coef_b = record.coef_b,
            rmse = record.rmse,
            %period_start,
            %period_end,
            "Baseline trained"
        );
        Ok(TrainingOutcome::Trained(record))
    }
}
