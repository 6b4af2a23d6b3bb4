// ABOUTME: Rating tier thresholds applied to sign-normalized deviation scores
// ABOUTME: Upper bounds per tier, inclusive toward the better tier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use formscore_core::constants::rating::{BEST_MAX, GOOD_MAX, NEUTRAL_MAX, POOR_MAX};
use serde::{Deserialize, Serialize};

/// Upper bound of each rating tier; scores above `poor_max` are rated worst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingThresholds {
    /// Best tier upper bound
    pub best_max: f64,
    /// Good tier upper bound
    pub good_max: f64,
    /// Neutral tier upper bound
    pub neutral_max: f64,
    /// Poor tier upper bound
    pub poor_max: f64,
}

impl RatingThresholds {
    /// Whether the bounds are strictly ascending
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.best_max < self.good_max
            && self.good_max < self.neutral_max
            && self.neutral_max < self.poor_max
    }
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            best_max: BEST_MAX,
            good_max: GOOD_MAX,
            neutral_max: NEUTRAL_MAX,
            poor_max: POOR_MAX,
        }
    }
}
