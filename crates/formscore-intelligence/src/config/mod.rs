// ABOUTME: Engine configuration for baseline training, rating tiers, and integrated scoring
// ABOUTME: Orchestrates domain configs and provides unified validation and env loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Engine Configuration Module
//!
//! Configuration is organized into domain-specific modules:
//! - `baseline` - rolling window length and minimum sample count
//! - `rating` - deviation score tier thresholds
//! - `scoring` - per-mode weight profiles and the missing slot policy

pub mod baseline;
pub mod error;
pub mod rating;
pub mod scoring;

pub use baseline::BaselineConfig;
pub use error::ConfigError;
pub use rating::RatingThresholds;
pub use scoring::{MissingSlotPolicy, ScoringConfig, WeightProfile};

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

use formscore_core::constants::baseline::REGRESSION_MIN_POINTS;
use formscore_core::constants::env_config;
use formscore_core::constants::scoring::WEIGHT_SUM_TOLERANCE;
use formscore_core::models::{MetricSlot, TrainingMode};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Global configuration singleton, holding the first load outcome
static ENGINE_CONFIG: OnceLock<Result<EngineConfig, ConfigError>> = OnceLock::new();

/// Main engine configuration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Baseline Trainer settings
    pub baseline: BaselineConfig,
    /// Rating tier thresholds
    pub rating: RatingThresholds,
    /// Integrated Scorer settings
    pub scoring: ScoringConfig,
}

impl EngineConfig {
    /// Get the global configuration instance, loading it on first use
    ///
    /// The outcome of the first load is cached, so a rejected environment
    /// keeps failing until the process restarts.
    ///
    /// # Errors
    ///
    /// Returns the load error if environment overrides were malformed or
    /// failed validation
    pub fn try_global() -> Result<&'static Self, ConfigError> {
        ENGINE_CONFIG
            .get_or_init(|| {
                Self::load().inspect_err(|e| error!("Failed to load engine config: {}", e))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Load configuration from defaults plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline.window_months == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "baseline window_months must be at least 1",
            ));
        }
        if self.baseline.min_samples < REGRESSION_MIN_POINTS {
            return Err(ConfigError::ValueOutOfRange(
                "baseline min_samples must be at least 2",
            ));
        }

        let rating = &self.rating;
        if [
            rating.best_max,
            rating.good_max,
            rating.neutral_max,
            rating.poor_max,
        ]
        .iter()
        .any(|t| !t.is_finite())
        {
            return Err(ConfigError::ValueOutOfRange(
                "rating thresholds must be finite",
            ));
        }
        if !rating.is_ascending() {
            return Err(ConfigError::InvalidRange(
                "rating thresholds must be strictly ascending (best < good < neutral < poor)",
            ));
        }

        for mode in TrainingMode::ALL {
            let profile = self.scoring.profile(mode);
            if MetricSlot::ALL
                .iter()
                .any(|slot| !(0.0..=1.0).contains(&profile.weight(*slot)))
            {
                return Err(ConfigError::ValueOutOfRange(
                    "slot weights must be between 0.0 and 1.0",
                ));
            }
            if (profile.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(ConfigError::InvalidWeights(
                    "each training mode weight profile must sum to 1.0",
                ));
            }
        }

        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var(
            env_config::BASELINE_WINDOW_MONTHS,
            &mut self.baseline.window_months,
        )?;
        Self::apply_env_var(
            env_config::BASELINE_MIN_SAMPLES,
            &mut self.baseline.min_samples,
        )?;

        if let Ok(val) = env::var(env_config::MISSING_SLOT_POLICY) {
            self.scoring.missing_slot_policy = val.parse()?;
        }

        Ok(self)
    }
}
