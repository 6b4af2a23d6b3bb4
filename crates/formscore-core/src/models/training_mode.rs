// ABOUTME: Training mode enumeration selecting the integrated score weight profile
// ABOUTME: Closed set of evaluation modes derived from raw workout training-type labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Coarse workout intensity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// `VO2max`, anaerobic, and speed work
    IntervalSprint,
    /// Tempo and lactate-threshold work
    TempoThreshold,
    /// Recovery and base-aerobic running
    #[default]
    LowModerate,
}

impl TrainingMode {
    /// All modes
    pub const ALL: [Self; 3] = [Self::IntervalSprint, Self::TempoThreshold, Self::LowModerate];

    /// Canonical snake_case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IntervalSprint => "interval_sprint",
            Self::TempoThreshold => "tempo_threshold",
            Self::LowModerate => "low_moderate",
        }
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| AppError::config(format!("Unknown training mode: '{s}'")))
    }
}
