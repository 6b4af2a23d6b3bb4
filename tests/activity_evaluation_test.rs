// ABOUTME: End-to-end tests training baselines then evaluating and persisting whole activities
// ABOUTME: Covers the flat-road power efficiency scenario, partial data, fallbacks, and upsert idempotence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::float_cmp)]

mod common;

use std::sync::Arc;

use common::{activity, create_memory_store, date, exact_daily_samples, seed_samples};
use formscore::config::EngineConfig;
use formscore::database::{InMemoryDataStore, PerformanceDataStore};
use formscore::errors::ErrorCode;
use formscore::intelligence::{ActivityEvaluationService, BaselineTrainer, TrainingOutcome};
use formscore::models::{ConditionGroup, MetricKind, MetricSlot, Rating, TrainingMode};

const PACE_MODELS: [(MetricKind, (f64, f64)); 3] = [
    (MetricKind::GroundContactTime, (150.0, 0.3)),
    (MetricKind::VerticalOscillation, (5.0, 0.01)),
    (MetricKind::VerticalRatio, (6.0, 0.005)),
];
const POWER_EFFICIENCY_MODEL: (f64, f64) = (0.030, 0.004);
const ACTIVITY_PACE: f64 = 330.0;
const ACTIVITY_POWER_PER_KG: f64 = 3.75;

/// 45 noiseless samples per metric inside 2025-08-28..2025-10-28, then train
async fn seed_and_train(store: &Arc<InMemoryDataStore>) {
    for (metric, model) in PACE_MODELS {
        let samples = exact_daily_samples(
            ConditionGroup::FlatRoad,
            date(2025, 8, 29),
            45,
            model,
            300.0..360.0,
        );
        seed_samples(store, "u1", metric, &samples);
    }
    let samples = exact_daily_samples(
        ConditionGroup::FlatRoad,
        date(2025, 8, 29),
        45,
        POWER_EFFICIENCY_MODEL,
        3.0..4.5,
    );
    seed_samples(store, "u1", MetricKind::PowerEfficiency, &samples);

    let trainer = BaselineTrainer::new(store.clone(), EngineConfig::default().baseline);
    let metrics: Vec<MetricKind> = MetricKind::ALL.to_vec();
    let outcomes = trainer
        .train_all("u1", ConditionGroup::FlatRoad, &metrics, date(2025, 10, 28))
        .await
        .unwrap();

    for outcome in &outcomes[..4] {
        assert!(matches!(outcome, TrainingOutcome::Trained(r) if r.sample_count == 45));
    }
    // No power/speed samples were seeded
    assert!(matches!(outcomes[4], TrainingOutcome::Skipped { .. }));
}

/// Activity on 2025-10-29 at baseline pace for every pace metric
fn seed_activity(store: &InMemoryDataStore, activity_id: &str, label: Option<&str>, with_power: bool) {
    store.add_activity(
        activity(activity_id, "u1", ConditionGroup::FlatRoad, date(2025, 10, 29)),
        label,
    );
    for (metric, (a, b)) in PACE_MODELS {
        store.set_measurement(
            activity_id,
            metric,
            Some(b.mul_add(ACTIVITY_PACE, a)),
            Some(ACTIVITY_PACE),
        );
    }
    if with_power {
        store.set_measurement(
            activity_id,
            MetricKind::PowerEfficiency,
            Some(0.043),
            Some(ACTIVITY_POWER_PER_KG),
        );
    }
}

fn service(store: &Arc<InMemoryDataStore>) -> ActivityEvaluationService {
    ActivityEvaluationService::new(store.clone(), &EngineConfig::default())
}

#[tokio::test]
async fn test_flat_road_tempo_scenario() {
    let store = create_memory_store();
    seed_and_train(&store).await;
    seed_activity(&store, "act-1", Some("TEMPO"), true);

    let evaluation = service(&store)
        .evaluate_activity_detailed("act-1", None)
        .await
        .unwrap();
    let record = &evaluation.record;

    assert_eq!(record.as_of, date(2025, 10, 29));
    assert_eq!(record.training_mode, TrainingMode::TempoThreshold);
    assert!(!record.mode_fallback);
    assert_eq!(record.results.len(), MetricKind::ALL.len());

    let power = record.result_for(MetricKind::PowerEfficiency).unwrap();
    assert!((power.expected.unwrap() - 0.045).abs() < 1e-9);
    assert_eq!(power.deviation_score, Some(-0.044));
    assert_eq!(power.rating, Some(Rating::Good));

    for (metric, _) in PACE_MODELS {
        let result = record.result_for(metric).unwrap();
        assert_eq!(result.deviation_score, Some(0.0), "{metric}");
        assert_eq!(result.rating, Some(Rating::Neutral), "{metric}");
    }
    assert_eq!(record.not_evaluated(), vec![MetricKind::PowerSpeed]);

    let score = record.integrated_score.unwrap();
    assert!((score - 98.46).abs() < 1e-6, "score {score}");
    assert!((score - 98.5).abs() < 0.05);

    let breakdown = evaluation.breakdown.unwrap();
    assert_eq!(breakdown.contributions.len(), 4);
    assert!(breakdown.missing_slots.is_empty());
}

#[tokio::test]
async fn test_evaluation_is_upserted_idempotently() {
    let store = create_memory_store();
    seed_and_train(&store).await;
    seed_activity(&store, "act-1", Some("TEMPO"), true);
    let service = service(&store);

    let first = service.evaluate_activity("act-1", None).await.unwrap();
    let second = service.evaluate_activity("act-1", None).await.unwrap();

    assert_eq!(store.evaluation_count(), 1);
    assert_eq!(first.results, second.results);
    assert_eq!(first.integrated_score, second.integrated_score);

    let stored = service.get_evaluation("act-1").await.unwrap().unwrap();
    assert_eq!(stored, second);
}

#[tokio::test]
async fn test_missing_power_sensor_degrades_to_partial_score() {
    let store = create_memory_store();
    seed_and_train(&store).await;
    seed_activity(&store, "act-2", Some("TEMPO"), false);

    let evaluation = service(&store)
        .evaluate_activity_detailed("act-2", None)
        .await
        .unwrap();
    let record = evaluation.record;

    assert!(!record.result_for(MetricKind::PowerEfficiency).unwrap().is_evaluated());
    assert_eq!(
        record.not_evaluated(),
        vec![MetricKind::PowerEfficiency, MetricKind::PowerSpeed]
    );
    let score = record.integrated_score.unwrap();
    assert!(score.is_finite());
    assert!((score - 100.0).abs() < 1e-6);
    assert_eq!(
        evaluation.breakdown.unwrap().missing_slots,
        vec![MetricSlot::Power]
    );
}

#[tokio::test]
async fn test_unmapped_label_uses_low_moderate_and_is_flagged() {
    let store = create_memory_store();
    seed_and_train(&store).await;
    seed_activity(&store, "act-3", Some("HILL_REPEATS_OF_DOOM"), true);

    let record = service(&store).evaluate_activity("act-3", None).await.unwrap();
    assert_eq!(record.training_mode, TrainingMode::LowModerate);
    assert!(record.mode_fallback);

    // low_moderate weights: 0.30, 0.25, 0.25, 0.20
    let expected = 0.20f64.mul_add(95.6, 0.80 * 100.0);
    assert!((record.integrated_score.unwrap() - expected).abs() < 1e-6);
}

#[tokio::test]
async fn test_missing_label_is_flagged() {
    let store = create_memory_store();
    seed_and_train(&store).await;
    seed_activity(&store, "act-4", None, true);

    let record = service(&store).evaluate_activity("act-4", None).await.unwrap();
    assert_eq!(record.training_mode, TrainingMode::LowModerate);
    assert!(record.mode_fallback);
}

#[tokio::test]
async fn test_explicit_as_of_before_training_leaves_everything_unevaluated() {
    let store = create_memory_store();
    seed_and_train(&store).await;
    seed_activity(&store, "act-5", Some("TEMPO"), true);

    let record = service(&store)
        .evaluate_activity("act-5", Some(date(2025, 10, 27)))
        .await
        .unwrap();

    assert_eq!(record.not_evaluated().len(), MetricKind::ALL.len());
    assert!(record.integrated_score.is_none());
    assert!(store.get_evaluation("act-5").await.unwrap().is_some());
}

#[tokio::test]
async fn test_unknown_activity_is_not_found() {
    let store = create_memory_store();
    let err = service(&store)
        .evaluate_activity("nope", None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(store.evaluation_count(), 0);
}
