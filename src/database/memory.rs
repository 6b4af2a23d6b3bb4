// ABOUTME: In-memory performance datastore using DashMap and an append-only baseline log
// ABOUTME: Seeding helpers let tests and embedders load activities, samples, and measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use formscore_core::models::{
    ActivityContext, BaselineRecord, ConditionGroup, EvaluationRecord, MetricKind, MetricSample,
};
use tokio::sync::RwLock;

use super::{select_latest, PerformanceDataStore};
use crate::errors::AppResult;

type SampleKey = (String, ConditionGroup, MetricKind);

#[derive(Debug, Clone)]
struct StoredActivity {
    context: ActivityContext,
    training_type_label: Option<String>,
}

/// Actual and predictor values of one metric for one activity
#[derive(Debug, Clone, Copy, Default)]
struct StoredMeasurement {
    actual: Option<f64>,
    independent: Option<f64>,
}

/// Datastore held entirely in process memory
///
/// Baselines live in a single append-only vector behind an async `RwLock`;
/// everything else sits in `DashMap`s keyed by activity or training key.
#[derive(Default)]
pub struct InMemoryDataStore {
    activities: DashMap<String, StoredActivity>,
    measurements: DashMap<(String, MetricKind), StoredMeasurement>,
    samples: DashMap<SampleKey, Vec<MetricSample>>,
    baselines: RwLock<Vec<BaselineRecord>>,
    evaluations: DashMap<String, EvaluationRecord>,
}

impl InMemoryDataStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an activity and its raw training-type label
    pub fn add_activity(&self, context: ActivityContext, training_type_label: Option<&str>) {
        self.activities.insert(
            context.activity_id.clone(),
            StoredActivity {
                context,
                training_type_label: training_type_label.map(str::to_owned),
            },
        );
    }

    /// Add one training sample for `(user_id, sample.condition_group, metric)`
    pub fn add_sample(&self, user_id: &str, metric: MetricKind, sample: MetricSample) {
        self.samples
            .entry((user_id.to_owned(), sample.condition_group, metric))
            .or_default()
            .push(sample);
    }

    /// Set the measured and predictor values of `metric` for an activity
    pub fn set_measurement(
        &self,
        activity_id: &str,
        metric: MetricKind,
        actual: Option<f64>,
        independent: Option<f64>,
    ) {
        self.measurements.insert(
            (activity_id.to_owned(), metric),
            StoredMeasurement {
                actual,
                independent,
            },
        );
    }

    /// Number of baseline rows ever inserted
    pub async fn baseline_count(&self) -> usize {
        self.baselines.read().await.len()
    }

    /// Number of stored evaluation records
    #[must_use]
    pub fn evaluation_count(&self) -> usize {
        self.evaluations.len()
    }
}

#[async_trait]
impl PerformanceDataStore for InMemoryDataStore {
    async fn query_samples(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<MetricSample>> {
        let key = (user_id.to_owned(), condition_group, metric);
        Ok(self
            .samples
            .get(&key)
            .map(|samples| {
                samples
                    .iter()
                    .filter(|s| (start..=end).contains(&s.timestamp.date_naive()))
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_activity_measurement(
        &self,
        activity_id: &str,
        metric: MetricKind,
    ) -> AppResult<Option<f64>> {
        Ok(self
            .measurements
            .get(&(activity_id.to_owned(), metric))
            .and_then(|m| m.actual))
    }

    async fn query_activity_independent_value(
        &self,
        activity_id: &str,
        metric: MetricKind,
    ) -> AppResult<Option<f64>> {
        Ok(self
            .measurements
            .get(&(activity_id.to_owned(), metric))
            .and_then(|m| m.independent))
    }

    async fn query_raw_training_type_label(&self, activity_id: &str) -> AppResult<Option<String>> {
        Ok(self
            .activities
            .get(activity_id)
            .and_then(|a| a.training_type_label.clone()))
    }

    async fn get_activity_context(&self, activity_id: &str) -> AppResult<Option<ActivityContext>> {
        Ok(self.activities.get(activity_id).map(|a| a.context.clone()))
    }

    async fn get_latest_baseline(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        as_of: NaiveDate,
    ) -> AppResult<Option<BaselineRecord>> {
        let baselines = self.baselines.read().await;
        let matching = baselines.iter().filter(|b| {
            b.user_id == user_id && b.condition_group == condition_group && b.metric == metric
        });
        Ok(select_latest(matching, as_of).cloned())
    }

    async fn list_baselines(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
    ) -> AppResult<Vec<BaselineRecord>> {
        let baselines = self.baselines.read().await;
        Ok(baselines
            .iter()
            .filter(|b| {
                b.user_id == user_id && b.condition_group == condition_group && b.metric == metric
            })
            .cloned()
            .collect())
    }

    async fn insert_baseline(&self, record: &BaselineRecord) -> AppResult<()> {
        self.baselines.write().await.push(record.clone());
        Ok(())
    }

    async fn upsert_evaluation(&self, record: &EvaluationRecord) -> AppResult<()> {
        self.evaluations
            .insert(record.activity_id.clone(), record.clone());
        Ok(())
    }

    async fn get_evaluation(&self, activity_id: &str) -> AppResult<Option<EvaluationRecord>> {
        Ok(self.evaluations.get(activity_id).map(|e| e.value().clone()))
    }
}
