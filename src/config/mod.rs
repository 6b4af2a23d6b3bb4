// ABOUTME: Configuration module for the evaluation engine process
// ABOUTME: Re-exports engine tuning types and owns database and environment settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration for the evaluation engine
//!
//! - **Database**: datastore location parsed from `FORMSCORE_DATABASE_URL`
//! - **Environment**: process settings assembled at startup
//! - **Engine**: trainer, rating, and scoring settings from `formscore-intelligence`

/// Datastore location
pub mod database;
/// Process-level settings loaded from the environment
pub mod environment;

pub use database::DatabaseUrl;
pub use environment::{Environment, Settings};
pub use formscore_intelligence::config::{
    BaselineConfig, ConfigError, MissingSlotPolicy, RatingThresholds, ScoringConfig,
    WeightProfile,
};
pub use formscore_intelligence::EngineConfig;
