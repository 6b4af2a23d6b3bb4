// ABOUTME: Maps raw workout training-type labels onto evaluation training modes
// ABOUTME: Static lookup table with a logged fallback to low_moderate for unmapped labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use formscore_core::models::TrainingMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Normalized label to mode table.
///
/// Labels are matched after trimming, upper-casing, and replacing spaces and
/// hyphens with underscores, so `"Lactate Threshold"` matches `LACTATE_THRESHOLD`.
const LABEL_TABLE: &[(&str, TrainingMode)] = &[
    // Recovery / base aerobic
    ("RECOVERY", TrainingMode::LowModerate),
    ("ACTIVE_RECOVERY", TrainingMode::LowModerate),
    ("BASE", TrainingMode::LowModerate),
    ("AEROBIC_BASE", TrainingMode::LowModerate),
    ("EASY", TrainingMode::LowModerate),
    ("LONG_RUN", TrainingMode::LowModerate),
    ("LOW_AEROBIC", TrainingMode::LowModerate),
    // Tempo / lactate threshold
    ("TEMPO", TrainingMode::TempoThreshold),
    ("HIGH_AEROBIC", TrainingMode::TempoThreshold),
    ("THRESHOLD", TrainingMode::TempoThreshold),
    ("LACTATE_THRESHOLD", TrainingMode::TempoThreshold),
    ("MARATHON_PACE", TrainingMode::TempoThreshold),
    // VO2max / anaerobic / speed
    ("VO2MAX", TrainingMode::IntervalSprint),
    ("VO2_MAX", TrainingMode::IntervalSprint),
    ("INTERVALS", TrainingMode::IntervalSprint),
    ("ANAEROBIC", TrainingMode::IntervalSprint),
    ("ANAEROBIC_CAPACITY", TrainingMode::IntervalSprint),
    ("SPEED", TrainingMode::IntervalSprint),
    ("SPRINT", TrainingMode::IntervalSprint),
];

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// The label was found in the lookup table
    Mapped,
    /// The label was present but not in the table
    UnmappedLabel,
    /// No label was available
    MissingLabel,
}

/// Training mode plus how it was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeClassification {
    /// Selected mode
    pub mode: TrainingMode,
    /// Provenance of `mode`
    pub source: ClassificationSource,
}

impl ModeClassification {
    /// Whether the default mode was used because the label could not be mapped
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source != ClassificationSource::Mapped
    }
}

/// Classifies raw training-type labels. Pure and total.
pub struct TrainingModeClassifier;

impl TrainingModeClassifier {
    /// Mode for a raw label; unmapped or absent labels yield `low_moderate`
    #[must_use]
    pub fn classify(raw_label: Option<&str>) -> TrainingMode {
        Self::classify_with_source(raw_label).mode
    }

    /// Mode for a raw label together with whether the fallback was taken
    #[must_use]
    pub fn classify_with_source(raw_label: Option<&str>) -> ModeClassification {
        let Some(label) = raw_label.map(str::trim).filter(|l| !l.is_empty()) else {
            debug!(
                fallback = %TrainingMode::default(),
                "No training type label, using fallback mode"
            );
            return ModeClassification {
                mode: TrainingMode::default(),
                source: ClassificationSource::MissingLabel,
            };
        };

        let normalized = normalize_label(label);
        if let Some((_, mode)) = LABEL_TABLE.iter().find(|(key, _)| *key == normalized) {
            return ModeClassification {
                mode: *mode,
                source: ClassificationSource::Mapped,
            };
        }

        warn!(
            raw_label = %label,
            normalized = %normalized,
            fallback = %TrainingMode::default(),
            "Unmapped training type label, using fallback mode"
        );
        ModeClassification {
            mode: TrainingMode::default(),
            source: ClassificationSource::UnmappedLabel,
        }
    }
}

fn normalize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
