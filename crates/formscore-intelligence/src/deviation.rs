// ABOUTME: Sign-normalized deviation scores and five-tier star ratings
// ABOUTME: Negative deviation always means better than the baseline expected
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use formscore_core::constants::rating::DEVIATION_DECIMALS;
use formscore_core::models::{Polarity, Rating};

use crate::config::RatingThresholds;

/// Round a deviation score to the precision ratings are computed at.
///
/// Tier boundaries are compared against the rounded value, so a score of
/// `-0.04994` counts as `-0.050` and lands in the best tier.
#[must_use]
pub fn round_deviation(raw: f64) -> f64 {
    let factor = 10_f64.powi(DEVIATION_DECIMALS);
    // `+ 0.0` folds -0.0 into 0.0
    (raw * factor).round() / factor + 0.0
}

/// Sign-normalized relative deviation `(actual - expected) / expected`.
///
/// Returns `None` when `expected` is zero or either value is not finite,
/// since no meaningful relative difference exists.
#[must_use]
pub fn deviation_score(actual: f64, expected: f64, polarity: Polarity) -> Option<f64> {
    if !actual.is_finite() || !expected.is_finite() || expected == 0.0 {
        return None;
    }
    let relative = (actual - expected) / expected.abs();
    Some(round_deviation(relative * polarity.sign()))
}

/// Maps deviation scores onto rating tiers
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviationRater {
    thresholds: RatingThresholds,
}

impl DeviationRater {
    /// Create a rater with the given tier thresholds
    #[must_use]
    pub const fn new(thresholds: RatingThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use
    #[must_use]
    pub const fn thresholds(&self) -> &RatingThresholds {
        &self.thresholds
    }

    /// Tier for a sign-normalized score; boundaries belong to the better tier
    #[must_use]
    pub fn rate(&self, deviation_score: f64) -> Rating {
        let t = &self.thresholds;
        if deviation_score <= t.best_max {
            Rating::Best
        } else if deviation_score <= t.good_max {
            Rating::Good
        } else if deviation_score <= t.neutral_max {
            Rating::Neutral
        } else if deviation_score <= t.poor_max {
            Rating::Poor
        } else {
            Rating::Worst
        }
    }

    /// Deviation score and rating for one measurement against its expectation
    #[must_use]
    pub fn assess(&self, actual: f64, expected: f64, polarity: Polarity) -> Option<(f64, Rating)> {
        deviation_score(actual, expected, polarity).map(|score| (score, self.rate(score)))
    }
}
