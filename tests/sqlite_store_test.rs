// ABOUTME: Tests for the SQLite performance datastore on an in-memory database
// ABOUTME: Covers sample windows, append-only baselines, no-lookahead lookup, and evaluation upserts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![cfg(feature = "sqlite")]
#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use chrono::{Duration, Utc};
use common::{activity, at_noon, create_sqlite_store, date, exact_daily_samples};
use formscore::config::{DatabaseUrl, EngineConfig};
use formscore::database::{PerformanceDataStore, SqliteDataStore};
use formscore::intelligence::{ActivityEvaluationService, BaselineTrainer};
use formscore::models::{
    BaselineRecord, ConditionGroup, EvaluationRecord, EvaluationResult, MetricKind, MetricSample,
    TrainingMode,
};
use uuid::Uuid;

fn baseline(period_end: chrono::NaiveDate, coef_a: f64) -> BaselineRecord {
    BaselineRecord {
        id: Uuid::new_v4(),
        user_id: "u1".into(),
        condition_group: ConditionGroup::FlatRoad,
        metric: MetricKind::GroundContactTime,
        coef_a,
        coef_b: 0.22,
        rmse: 1.5,
        sample_count: 40,
        period_start: period_end - Duration::days(61),
        period_end,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_query_samples_filters_by_key_and_inclusive_window() {
    let store = create_sqlite_store().await;
    let samples = exact_daily_samples(
        ConditionGroup::FlatRoad,
        date(2025, 9, 1),
        30,
        (150.0, 0.3),
        300.0..360.0,
    );
    for sample in &samples {
        store
            .add_sample("u1", MetricKind::GroundContactTime, sample)
            .await
            .unwrap();
    }
    // Same day, different key
    store
        .add_sample(
            "u2",
            MetricKind::GroundContactTime,
            &MetricSample {
                condition_group: ConditionGroup::FlatRoad,
                timestamp: at_noon(date(2025, 9, 5)),
                independent_value: 320.0,
                dependent_value: 246.0,
            },
        )
        .await
        .unwrap();

    let window = store
        .query_samples(
            "u1",
            ConditionGroup::FlatRoad,
            MetricKind::GroundContactTime,
            date(2025, 9, 1),
            date(2025, 9, 10),
        )
        .await
        .unwrap();
    assert_eq!(window.len(), 10);
    assert_eq!(window[0], samples[0]);
    assert_eq!(window[9], samples[9]);

    let other_metric = store
        .query_samples(
            "u1",
            ConditionGroup::FlatRoad,
            MetricKind::VerticalRatio,
            date(2025, 9, 1),
            date(2025, 9, 30),
        )
        .await
        .unwrap();
    assert!(other_metric.is_empty());
}

#[tokio::test]
async fn test_baselines_are_append_only_and_selected_without_lookahead() {
    let store = create_sqlite_store().await;
    let september = baseline(date(2025, 9, 30), 177.2);
    let october = baseline(date(2025, 10, 31), 170.0);
    store.insert_baseline(&september).await.unwrap();
    store.insert_baseline(&october).await.unwrap();

    let selected = store
        .get_latest_baseline(
            "u1",
            ConditionGroup::FlatRoad,
            MetricKind::GroundContactTime,
            date(2025, 10, 15),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(selected, september);

    let selected = store
        .get_latest_baseline(
            "u1",
            ConditionGroup::FlatRoad,
            MetricKind::GroundContactTime,
            date(2025, 10, 31),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(selected.id, october.id);

    let none = store
        .get_latest_baseline(
            "u1",
            ConditionGroup::FlatRoad,
            MetricKind::GroundContactTime,
            date(2025, 9, 1),
        )
        .await
        .unwrap();
    assert!(none.is_none());

    let history = store
        .list_baselines("u1", ConditionGroup::FlatRoad, MetricKind::GroundContactTime)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, september.id);
}

#[tokio::test]
async fn test_activity_measurements_and_label() {
    let store = create_sqlite_store().await;
    store
        .add_activity(
            &activity("act-1", "u1", ConditionGroup::Track, date(2025, 11, 2)),
            Some("INTERVALS"),
        )
        .await
        .unwrap();
    store
        .set_measurement("act-1", MetricKind::PowerEfficiency, Some(0.043), None)
        .await
        .unwrap();

    let context = store.get_activity_context("act-1").await.unwrap().unwrap();
    assert_eq!(context.user_id, "u1");
    assert_eq!(context.condition_group, ConditionGroup::Track);
    assert_eq!(context.started_at, at_noon(date(2025, 11, 2)));

    assert_eq!(
        store
            .query_raw_training_type_label("act-1")
            .await
            .unwrap()
            .as_deref(),
        Some("INTERVALS")
    );
    assert_eq!(
        store
            .query_activity_measurement("act-1", MetricKind::PowerEfficiency)
            .await
            .unwrap(),
        Some(0.043)
    );
    assert_eq!(
        store
            .query_activity_independent_value("act-1", MetricKind::PowerEfficiency)
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        store
            .query_activity_measurement("act-1", MetricKind::GroundContactTime)
            .await
            .unwrap(),
        None
    );
    assert!(store.get_activity_context("other").await.unwrap().is_none());
    assert!(store
        .query_raw_training_type_label("other")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_upsert_evaluation_replaces_previous_record() {
    let store = create_sqlite_store().await;
    let mut record = EvaluationRecord {
        activity_id: "act-1".into(),
        user_id: "u1".into(),
        condition_group: ConditionGroup::FlatRoad,
        results: MetricKind::ALL
            .into_iter()
            .map(EvaluationResult::not_evaluated)
            .collect(),
        integrated_score: None,
        training_mode: TrainingMode::LowModerate,
        mode_fallback: true,
        as_of: date(2025, 11, 2),
        evaluated_at: Utc::now(),
    };
    store.upsert_evaluation(&record).await.unwrap();

    record.integrated_score = Some(97.25);
    record.training_mode = TrainingMode::TempoThreshold;
    record.mode_fallback = false;
    store.upsert_evaluation(&record).await.unwrap();

    let stored = store.get_evaluation("act-1").await.unwrap().unwrap();
    assert_eq!(stored, record);
    assert!(store.get_evaluation("act-2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_train_and_evaluate_through_sqlite() {
    let store = create_sqlite_store().await;
    let samples = exact_daily_samples(
        ConditionGroup::FlatRoad,
        date(2025, 8, 29),
        45,
        (0.030, 0.004),
        3.0..4.5,
    );
    for sample in &samples {
        store
            .add_sample("u1", MetricKind::PowerEfficiency, sample)
            .await
            .unwrap();
    }
    store
        .add_activity(
            &activity("act-1", "u1", ConditionGroup::FlatRoad, date(2025, 10, 29)),
            Some("THRESHOLD"),
        )
        .await
        .unwrap();
    store
        .set_measurement("act-1", MetricKind::PowerEfficiency, Some(0.043), Some(3.75))
        .await
        .unwrap();

    let config = EngineConfig::default();
    let record = BaselineTrainer::new(store.clone(), config.baseline.clone())
        .train(
            "u1",
            ConditionGroup::FlatRoad,
            MetricKind::PowerEfficiency,
            2,
            date(2025, 10, 28),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.sample_count, 45);

    let evaluation = ActivityEvaluationService::new(store.clone(), &config)
        .evaluate_activity("act-1", None)
        .await
        .unwrap();
    let power = evaluation.result_for(MetricKind::PowerEfficiency).unwrap();
    assert_eq!(power.deviation_score, Some(-0.044));
    assert_eq!(power.baseline_id, Some(record.id));
    assert_eq!(evaluation.training_mode, TrainingMode::TempoThreshold);
    // Only the power slot was evaluated
    assert!((evaluation.integrated_score.unwrap() - 95.6).abs() < 1e-6);

    let stored = store.get_evaluation("act-1").await.unwrap().unwrap();
    assert_eq!(stored, evaluation);
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("formscore.db"),
    };

    let record = baseline(date(2025, 10, 28), 177.2);
    {
        let store = SqliteDataStore::new(&url).await.unwrap();
        store.insert_baseline(&record).await.unwrap();
    }

    let reopened = SqliteDataStore::new(&url).await.unwrap();
    let history = reopened
        .list_baselines("u1", ConditionGroup::FlatRoad, MetricKind::GroundContactTime)
        .await
        .unwrap();
    assert_eq!(history, vec![record]);
}
