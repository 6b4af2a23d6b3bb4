// ABOUTME: Engine constants organized by domain (baseline windows, rating tiers, scoring)
// ABOUTME: Pure data defaults consumed by configuration and the intelligence algorithms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Constants module
//!
//! Defaults only. Runtime values come from `EngineConfig`, which starts from
//! these and applies environment overrides.

/// Baseline training defaults
pub mod baseline {
    /// Default rolling window length in months
    pub const DEFAULT_WINDOW_MONTHS: u32 = 2;
    /// Minimum samples before a baseline is fitted
    pub const MIN_SAMPLES: usize = 10;
    /// Smallest sample count a linear fit can be computed from
    pub const REGRESSION_MIN_POINTS: usize = 2;
}

/// Deviation score rating tiers (upper bounds, inclusive toward the better tier)
pub mod rating {
    /// Scores at or below this are rated best
    pub const BEST_MAX: f64 = -0.05;
    /// Scores at or below this are rated good
    pub const GOOD_MAX: f64 = -0.02;
    /// Scores at or below this are rated neutral
    pub const NEUTRAL_MAX: f64 = 0.02;
    /// Scores at or below this are rated poor; anything above is worst
    pub const POOR_MAX: f64 = 0.05;
    /// Decimal places deviation scores are rounded to before rating
    pub const DEVIATION_DECIMALS: i32 = 3;
}

/// Integrated score defaults
pub mod scoring {
    /// Score of a slot that exactly matches its baseline
    pub const PERFECT_SLOT_SCORE: f64 = 100.0;
    /// Allowed drift of a weight profile sum from 1.0
    pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

    /// Interval/sprint weights: ground time, oscillation, ratio, power
    pub const INTERVAL_SPRINT_WEIGHTS: [f64; 4] = [0.25, 0.20, 0.15, 0.40];
    /// Tempo/threshold weights: ground time, oscillation, ratio, power
    pub const TEMPO_THRESHOLD_WEIGHTS: [f64; 4] = [0.25, 0.20, 0.20, 0.35];
    /// Low/moderate weights: ground time, oscillation, ratio, power
    pub const LOW_MODERATE_WEIGHTS: [f64; 4] = [0.30, 0.25, 0.25, 0.20];
}

/// Environment variable names recognised by the configuration loader
pub mod env_config {
    /// Rolling window length override
    pub const BASELINE_WINDOW_MONTHS: &str = "FORMSCORE_BASELINE_WINDOW_MONTHS";
    /// Minimum sample count override
    pub const BASELINE_MIN_SAMPLES: &str = "FORMSCORE_BASELINE_MIN_SAMPLES";
    /// Missing slot policy override (`renormalize` or `zero_contribution`)
    pub const MISSING_SLOT_POLICY: &str = "FORMSCORE_MISSING_SLOT_POLICY";
    /// Database URL for the SQLite datastore
    pub const DATABASE_URL: &str = "FORMSCORE_DATABASE_URL";
    /// Default database URL
    pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
}

/// Service identity used in structured logs
pub mod service_names {
    /// Engine service name
    pub const FORMSCORE_ENGINE: &str = "formscore-engine";
}
