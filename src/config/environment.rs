// ABOUTME: Process-level settings assembled from environment variables
// ABOUTME: Combines the database location with validated engine configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::env;

use formscore_intelligence::EngineConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::database::DatabaseUrl;
use crate::errors::AppResult;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Everything the engine needs to start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Deployment environment
    pub environment: Environment,
    /// Datastore location
    pub database_url: DatabaseUrl,
    /// Trainer, rating, and scoring configuration
    pub engine: EngineConfig,
}

impl Settings {
    /// Load settings from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the database URL is unsupported or an engine
    /// override is malformed or fails validation
    pub fn from_env() -> AppResult<Self> {
        info!("Loading engine settings from environment variables");

        let settings = Self {
            environment: Environment::from_str_or_default(
                &env::var("ENVIRONMENT").unwrap_or_default(),
            ),
            database_url: DatabaseUrl::from_env()?,
            engine: EngineConfig::load()?,
        };
        info!("{}", settings.summary());
        Ok(settings)
    }

    /// Summary of the settings for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "FormScore Engine Configuration:\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Baseline Window: {} months\n\
             - Minimum Samples: {}\n\
             - Missing Slot Policy: {}",
            self.environment,
            self.database_url,
            self.engine.baseline.window_months,
            self.engine.baseline.min_samples,
            self.engine.scoring.missing_slot_policy,
        )
    }
}

