// ABOUTME: Integrated score configuration: per-mode weight profiles and missing slot policy
// ABOUTME: Weight profiles are ordered ground time, oscillation, ratio, power
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::fmt;
use std::str::FromStr;

use formscore_core::constants::scoring::{
    INTERVAL_SPRINT_WEIGHTS, LOW_MODERATE_WEIGHTS, TEMPO_THRESHOLD_WEIGHTS,
};
use formscore_core::models::{MetricSlot, TrainingMode};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Weight of each integrated score slot for one training mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    /// Ground-time-like metric weight
    pub ground_time: f64,
    /// Oscillation-like metric weight
    pub oscillation: f64,
    /// Ratio-like metric weight
    pub ratio: f64,
    /// Power-efficiency metric weight
    pub power: f64,
}

impl WeightProfile {
    /// Build a profile from a `[ground_time, oscillation, ratio, power]` tuple
    #[must_use]
    pub const fn from_array(weights: [f64; 4]) -> Self {
        Self {
            ground_time: weights[0],
            oscillation: weights[1],
            ratio: weights[2],
            power: weights[3],
        }
    }

    /// Weight of the given slot
    #[must_use]
    pub const fn weight(&self, slot: MetricSlot) -> f64 {
        match slot {
            MetricSlot::GroundTime => self.ground_time,
            MetricSlot::Oscillation => self.oscillation,
            MetricSlot::Ratio => self.ratio,
            MetricSlot::Power => self.power,
        }
    }

    /// Sum of all four weights
    #[must_use]
    pub fn sum(&self) -> f64 {
        MetricSlot::ALL.iter().map(|slot| self.weight(*slot)).sum()
    }
}

/// How the integrated score treats slots whose metric was not evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSlotPolicy {
    /// Drop missing slots and rescale the remaining weights to sum to 1.0
    #[default]
    Renormalize,
    /// Keep the original weights; missing slots contribute nothing
    ZeroContribution,
}

impl fmt::Display for MissingSlotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renormalize => f.write_str("renormalize"),
            Self::ZeroContribution => f.write_str("zero_contribution"),
        }
    }
}

impl FromStr for MissingSlotPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "renormalize" => Ok(Self::Renormalize),
            "zero_contribution" | "zero" => Ok(Self::ZeroContribution),
            other => Err(ConfigError::Parse(format!(
                "Unknown missing slot policy: {other}"
            ))),
        }
    }
}

/// Integrated Scorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weights for `interval_sprint`
    pub interval_sprint: WeightProfile,
    /// Weights for `tempo_threshold`
    pub tempo_threshold: WeightProfile,
    /// Weights for `low_moderate`
    pub low_moderate: WeightProfile,
    /// Missing slot handling
    pub missing_slot_policy: MissingSlotPolicy,
}

impl ScoringConfig {
    /// Weight profile bound to a training mode
    #[must_use]
    pub const fn profile(&self, mode: TrainingMode) -> &WeightProfile {
        match mode {
            TrainingMode::IntervalSprint => &self.interval_sprint,
            TrainingMode::TempoThreshold => &self.tempo_threshold,
            TrainingMode::LowModerate => &self.low_moderate,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            interval_sprint: WeightProfile::from_array(INTERVAL_SPRINT_WEIGHTS),
            tempo_threshold: WeightProfile::from_array(TEMPO_THRESHOLD_WEIGHTS),
            low_moderate: WeightProfile::from_array(LOW_MODERATE_WEIGHTS),
            missing_slot_policy: MissingSlotPolicy::default(),
        }
    }
}
