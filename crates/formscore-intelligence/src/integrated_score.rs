// ABOUTME: Weighted composite of per-metric deviation scores using training mode profiles
// ABOUTME: Handles missing slots by renormalizing or zero-filling per configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use formscore_core::constants::scoring::PERFECT_SLOT_SCORE;
use formscore_core::models::{EvaluationResult, MetricKind, MetricSlot, TrainingMode};
use serde::{Deserialize, Serialize};

use crate::config::{MissingSlotPolicy, ScoringConfig};

/// One slot's share of the integrated score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotContribution {
    /// Slot filled
    pub slot: MetricSlot,
    /// Metric that filled it
    pub metric: MetricKind,
    /// Deviation score the slot score came from
    pub deviation_score: f64,
    /// `100 - |deviation| * 100`, floored at zero
    pub slot_score: f64,
    /// Weight actually applied after the missing slot policy
    pub effective_weight: f64,
}

/// Composite score with its breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedScore {
    /// Weighted composite, 0..=100
    pub score: f64,
    /// Mode whose profile was applied
    pub mode: TrainingMode,
    /// Contributing slots in weight-tuple order
    pub contributions: Vec<SlotContribution>,
    /// Slots with no evaluated metric
    pub missing_slots: Vec<MetricSlot>,
    /// Sum of configured weights of the slots that were present
    pub weight_present: f64,
    /// Policy used for `missing_slots`
    pub policy: MissingSlotPolicy,
}

/// Combines per-metric evaluation results into one score
#[derive(Debug, Clone, Default)]
pub struct IntegratedScorer {
    config: ScoringConfig,
}

impl IntegratedScorer {
    /// Create a scorer with the given weight profiles and policy
    #[must_use]
    pub const fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score of a single slot for a deviation score
    #[must_use]
    pub fn slot_score(deviation_score: f64) -> f64 {
        deviation_score
            .abs()
            .mul_add(-PERFECT_SLOT_SCORE, PERFECT_SLOT_SCORE)
            .max(0.0)
    }

    /// Weighted composite over the four slots.
    ///
    /// Results for metrics without a slot, or without a deviation score, are
    /// ignored. Returns `None` when no slot could be filled or every filled
    /// slot carries zero weight.
    #[must_use]
    pub fn integrate(
        &self,
        results: &[EvaluationResult],
        mode: TrainingMode,
    ) -> Option<IntegratedScore> {
        let profile = self.config.profile(mode);
        let policy = self.config.missing_slot_policy;

        let mut present = Vec::with_capacity(MetricSlot::ALL.len());
        let mut missing_slots = Vec::new();
        for slot in MetricSlot::ALL {
            let filled = results.iter().find_map(|result| {
                (result.metric.slot() == Some(slot))
                    .then_some(result.deviation_score)
                    .flatten()
                    .map(|deviation| (result.metric, deviation))
            });
            match filled {
                Some((metric, deviation)) => present.push((slot, metric, deviation)),
                None => missing_slots.push(slot),
            }
        }

        let weight_present: f64 = present
            .iter()
            .map(|(slot, _, _)| profile.weight(*slot))
            .sum();
        if present.is_empty() || weight_present <= 0.0 {
            return None;
        }

        let scale = match policy {
            MissingSlotPolicy::Renormalize => 1.0 / weight_present,
            MissingSlotPolicy::ZeroContribution => 1.0,
        };

        let contributions: Vec<SlotContribution> = present
            .into_iter()
            .map(|(slot, metric, deviation_score)| SlotContribution {
                slot,
                metric,
                deviation_score,
                slot_score: Self::slot_score(deviation_score),
                effective_weight: profile.weight(slot) * scale,
            })
            .collect();

        let score = contributions
            .iter()
            .map(|c| c.effective_weight * c.slot_score)
            .sum();

        Some(IntegratedScore {
            score,
            mode,
            contributions,
            missing_slots,
            weight_present,
            policy,
        })
    }
}
