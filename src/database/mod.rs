// ABOUTME: Datastore abstraction for training samples, activity measurements, baselines, and evaluations
// ABOUTME: Async trait implemented by the in-memory store and the SQLite store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Performance datastore
//!
//! The engine reads samples and activity measurements through
//! [`PerformanceDataStore`] and writes two things back: baseline rows, which
//! are append-only, and evaluation records, which are upserted by activity id.

/// In-memory implementation used by tests and embedding callers
pub mod memory;
/// `SQLite` implementation backed by `sqlx`
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryDataStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDataStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use formscore_core::models::{
    ActivityContext, BaselineRecord, ConditionGroup, EvaluationRecord, MetricKind, MetricSample,
};

use crate::errors::AppResult;

/// Query and write interface the engine depends on
///
/// Implementations must never update or delete baseline rows, and
/// [`get_latest_baseline`](Self::get_latest_baseline) must never return a
/// row whose `period_end` is after `as_of`.
#[async_trait]
pub trait PerformanceDataStore: Send + Sync {
    /// Samples for a training key recorded between `start` and `end`, both inclusive
    async fn query_samples(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<MetricSample>>;

    /// Measured value of `metric` for an activity
    async fn query_activity_measurement(
        &self,
        activity_id: &str,
        metric: MetricKind,
    ) -> AppResult<Option<f64>>;

    /// Predictor value for `metric` at the time of the activity
    async fn query_activity_independent_value(
        &self,
        activity_id: &str,
        metric: MetricKind,
    ) -> AppResult<Option<f64>>;

    /// Raw training-type label recorded for the activity
    async fn query_raw_training_type_label(&self, activity_id: &str) -> AppResult<Option<String>>;

    /// Owner, condition group, and start time of an activity
    async fn get_activity_context(&self, activity_id: &str) -> AppResult<Option<ActivityContext>>;

    /// Latest baseline with `period_end <= as_of`; ties go to the newest row
    async fn get_latest_baseline(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        as_of: NaiveDate,
    ) -> AppResult<Option<BaselineRecord>>;

    /// Every baseline for a key, oldest first
    async fn list_baselines(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
    ) -> AppResult<Vec<BaselineRecord>>;

    /// Append a baseline row
    async fn insert_baseline(&self, record: &BaselineRecord) -> AppResult<()>;

    /// Create or replace the evaluation for `record.activity_id`
    async fn upsert_evaluation(&self, record: &EvaluationRecord) -> AppResult<()>;

    /// Stored evaluation for an activity
    async fn get_evaluation(&self, activity_id: &str) -> AppResult<Option<EvaluationRecord>>;
}

/// Pick the baseline an evaluation as of `as_of` may use
pub(crate) fn select_latest<'a, I>(records: I, as_of: NaiveDate) -> Option<&'a BaselineRecord>
where
    I: IntoIterator<Item = &'a BaselineRecord>,
{
    records
        .into_iter()
        .filter(|record| record.is_available_at(as_of))
        .max_by_key(|record| (record.period_end, record.created_at))
}
