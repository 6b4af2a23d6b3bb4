// ABOUTME: Tests for the weighted integrated score over the four metric slots
// ABOUTME: Covers mode weight profiles, missing slot policies, and score floors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::float_cmp)]

use formscore::config::{MissingSlotPolicy, ScoringConfig};
use formscore::intelligence::IntegratedScorer;
use formscore::models::{EvaluationResult, MetricKind, MetricSlot, Rating, TrainingMode};
use uuid::Uuid;

fn result(metric: MetricKind, deviation_score: f64, rating: Rating) -> EvaluationResult {
    EvaluationResult::evaluated(metric, 1.0, 1.0, deviation_score, rating, Uuid::nil())
}

fn neutral_pace_metrics() -> Vec<EvaluationResult> {
    vec![
        result(MetricKind::GroundContactTime, 0.0, Rating::Neutral),
        result(MetricKind::VerticalOscillation, 0.0, Rating::Neutral),
        result(MetricKind::VerticalRatio, 0.0, Rating::Neutral),
    ]
}

fn scorer(policy: MissingSlotPolicy) -> IntegratedScorer {
    IntegratedScorer::new(ScoringConfig {
        missing_slot_policy: policy,
        ..ScoringConfig::default()
    })
}

#[test]
fn test_tempo_composite_with_one_good_power_metric() {
    let mut results = neutral_pace_metrics();
    results.push(result(MetricKind::PowerEfficiency, -0.044, Rating::Good));

    let score = IntegratedScorer::default()
        .integrate(&results, TrainingMode::TempoThreshold)
        .unwrap();

    assert!((score.score - 98.46).abs() < 1e-9, "score {}", score.score);
    assert!(score.missing_slots.is_empty());
    assert!((score.weight_present - 1.0).abs() < 1e-12);

    let power = score
        .contributions
        .iter()
        .find(|c| c.slot == MetricSlot::Power)
        .unwrap();
    assert!((power.slot_score - 95.6).abs() < 1e-9);
    assert!((power.effective_weight - 0.35).abs() < 1e-12);
}

#[test]
fn test_mode_selects_weight_profile() {
    let results = vec![
        result(MetricKind::GroundContactTime, 0.10, Rating::Worst),
        result(MetricKind::VerticalOscillation, 0.0, Rating::Neutral),
        result(MetricKind::VerticalRatio, 0.0, Rating::Neutral),
        result(MetricKind::PowerEfficiency, 0.0, Rating::Neutral),
    ];
    let scorer = IntegratedScorer::default();

    // Ground time slot score is 90; only its weight differs between modes
    let sprint = scorer.integrate(&results, TrainingMode::IntervalSprint).unwrap();
    let easy = scorer.integrate(&results, TrainingMode::LowModerate).unwrap();
    assert!((sprint.score - 97.5).abs() < 1e-9);
    assert!((easy.score - 97.0).abs() < 1e-9);
}

#[test]
fn test_renormalize_rescales_present_weights() {
    let mut results = neutral_pace_metrics();
    results[0] = result(MetricKind::GroundContactTime, 0.01, Rating::Neutral);

    let score = scorer(MissingSlotPolicy::Renormalize)
        .integrate(&results, TrainingMode::TempoThreshold)
        .unwrap();

    assert_eq!(score.missing_slots, vec![MetricSlot::Power]);
    assert!((score.weight_present - 0.65).abs() < 1e-12);
    let expected = 0.25f64.mul_add(99.0, 0.40 * 100.0) / 0.65;
    assert!((score.score - expected).abs() < 1e-9, "score {}", score.score);
    let total_weight: f64 = score.contributions.iter().map(|c| c.effective_weight).sum();
    assert!((total_weight - 1.0).abs() < 1e-12);
}

#[test]
fn test_zero_contribution_keeps_original_weights() {
    let mut results = neutral_pace_metrics();
    results[0] = result(MetricKind::GroundContactTime, 0.01, Rating::Neutral);

    let score = scorer(MissingSlotPolicy::ZeroContribution)
        .integrate(&results, TrainingMode::TempoThreshold)
        .unwrap();

    assert_eq!(score.policy, MissingSlotPolicy::ZeroContribution);
    assert!((score.score - 64.75).abs() < 1e-9, "score {}", score.score);
}

#[test]
fn test_not_evaluated_and_unslotted_metrics_are_ignored() {
    let results = vec![
        result(MetricKind::GroundContactTime, 0.0, Rating::Neutral),
        EvaluationResult::not_evaluated(MetricKind::VerticalOscillation),
        EvaluationResult::not_evaluated(MetricKind::VerticalRatio),
        EvaluationResult::not_evaluated(MetricKind::PowerEfficiency),
        result(MetricKind::PowerSpeed, 0.5, Rating::Worst),
    ];

    let score = IntegratedScorer::default()
        .integrate(&results, TrainingMode::LowModerate)
        .unwrap();

    assert!(score.score.is_finite());
    assert!((score.score - 100.0).abs() < 1e-9);
    assert_eq!(score.contributions.len(), 1);
    assert_eq!(score.missing_slots.len(), 3);
}

#[test]
fn test_no_evaluated_slots_yields_no_score() {
    let results: Vec<EvaluationResult> = MetricKind::ALL
        .into_iter()
        .map(EvaluationResult::not_evaluated)
        .collect();
    assert!(IntegratedScorer::default()
        .integrate(&results, TrainingMode::TempoThreshold)
        .is_none());
    assert!(IntegratedScorer::default()
        .integrate(&[], TrainingMode::TempoThreshold)
        .is_none());
}

#[test]
fn test_slot_score_is_symmetric_and_floored() {
    assert_eq!(IntegratedScorer::slot_score(0.0), 100.0);
    assert!((IntegratedScorer::slot_score(0.03) - 97.0).abs() < 1e-9);
    assert!((IntegratedScorer::slot_score(-0.03) - 97.0).abs() < 1e-9);
    assert_eq!(IntegratedScorer::slot_score(1.5), 0.0);
}
