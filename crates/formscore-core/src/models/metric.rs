// ABOUTME: Metric catalogue for baseline training and evaluation
// ABOUTME: Each metric carries its polarity, independent variable, unit, and scoring slot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Which direction of change counts as an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Cost-like metric: smaller than expected is better (ground contact time)
    LowerIsBetter,
    /// Benefit-like metric: larger than expected is better (speed)
    HigherIsBetter,
}

impl Polarity {
    /// Multiplier that maps a raw relative difference onto the
    /// "negative means better" convention
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::LowerIsBetter => 1.0,
            Self::HigherIsBetter => -1.0,
        }
    }
}

/// Predictor a baseline regresses the metric against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndependentVariable {
    /// Pace in seconds per kilometre
    PaceSecPerKm,
    /// Power normalised by body mass at the time of the activity (W/kg)
    PowerPerKg,
}

/// One of the four fixed positions in the integrated score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSlot {
    /// Ground-time-like slot
    GroundTime,
    /// Oscillation-like slot
    Oscillation,
    /// Ratio-like slot
    Ratio,
    /// Power-efficiency slot
    Power,
}

impl MetricSlot {
    /// All slots in weight-tuple order
    pub const ALL: [Self; 4] = [Self::GroundTime, Self::Oscillation, Self::Ratio, Self::Power];

    /// Position of this slot in a weight tuple
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::GroundTime => 0,
            Self::Oscillation => 1,
            Self::Ratio => 2,
            Self::Power => 3,
        }
    }
}

/// Metrics the engine knows how to baseline and evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Ground contact time (ms) predicted from pace
    GroundContactTime,
    /// Vertical oscillation (cm) predicted from pace
    VerticalOscillation,
    /// Vertical ratio (%) predicted from pace
    VerticalRatio,
    /// Vertical oscillation per watt predicted from power per kg
    PowerEfficiency,
    /// Speed (m/s) predicted from power per kg
    PowerSpeed,
}

impl MetricKind {
    /// Every metric in the catalogue
    pub const ALL: [Self; 5] = [
        Self::GroundContactTime,
        Self::VerticalOscillation,
        Self::VerticalRatio,
        Self::PowerEfficiency,
        Self::PowerSpeed,
    ];

    /// Canonical snake_case identifier used in storage and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GroundContactTime => "ground_contact_time",
            Self::VerticalOscillation => "vertical_oscillation",
            Self::VerticalRatio => "vertical_ratio",
            Self::PowerEfficiency => "power_efficiency",
            Self::PowerSpeed => "power_speed",
        }
    }

    /// Polarity used to sign-normalize deviation scores
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::PowerSpeed => Polarity::HigherIsBetter,
            Self::GroundContactTime
            | Self::VerticalOscillation
            | Self::VerticalRatio
            | Self::PowerEfficiency => Polarity::LowerIsBetter,
        }
    }

    /// Predictor used by this metric's baseline
    #[must_use]
    pub const fn independent_variable(self) -> IndependentVariable {
        match self {
            Self::GroundContactTime | Self::VerticalOscillation | Self::VerticalRatio => {
                IndependentVariable::PaceSecPerKm
            }
            Self::PowerEfficiency | Self::PowerSpeed => IndependentVariable::PowerPerKg,
        }
    }

    /// Unit of the dependent value
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::GroundContactTime => "ms",
            Self::VerticalOscillation => "cm",
            Self::VerticalRatio => "%",
            Self::PowerEfficiency => "cm/W",
            Self::PowerSpeed => "m/s",
        }
    }

    /// Integrated-score slot, if this metric takes part in the composite
    #[must_use]
    pub const fn slot(self) -> Option<MetricSlot> {
        match self {
            Self::GroundContactTime => Some(MetricSlot::GroundTime),
            Self::VerticalOscillation => Some(MetricSlot::Oscillation),
            Self::VerticalRatio => Some(MetricSlot::Ratio),
            Self::PowerEfficiency => Some(MetricSlot::Power),
            Self::PowerSpeed => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| AppError::config(format!("Unknown metric identifier: '{s}'")))
    }
}
