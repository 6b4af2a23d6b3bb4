// ABOUTME: Baseline training configuration (rolling window length, minimum samples)
// ABOUTME: Defaults come from the core baseline constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use formscore_core::constants::baseline::{DEFAULT_WINDOW_MONTHS, MIN_SAMPLES};
use serde::{Deserialize, Serialize};

/// Baseline Trainer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Rolling window length in months ending at the training end date
    pub window_months: u32,
    /// Fewer samples than this yields no baseline
    pub min_samples: usize,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            window_months: DEFAULT_WINDOW_MONTHS,
            min_samples: MIN_SAMPLES,
        }
    }
}
