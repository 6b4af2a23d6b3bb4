// ABOUTME: Baseline fitting and evaluation algorithms for the FormScore engine
// ABOUTME: Regression, deviation rating, training mode classification, integrated scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # `FormScore` Intelligence
//!
//! Pure computation with no datastore access. The engine crate wires these
//! algorithms to a `PerformanceDataStore`.

/// Engine configuration (baseline window, rating tiers, weight profiles)
pub mod config;

/// Sign-normalized deviation scores and star ratings
pub mod deviation;

/// Weighted composite of per-metric evaluations
pub mod integrated_score;

/// Least squares fit of `y = a + b*x`
pub mod regression;

/// Raw training-type label classification
pub mod training_mode;

pub use config::{EngineConfig, MissingSlotPolicy};
pub use deviation::{deviation_score, round_deviation, DeviationRater};
pub use integrated_score::{IntegratedScore, IntegratedScorer, SlotContribution};
pub use regression::{LinearFit, LinearRegression, RegressionError};
pub use training_mode::{ClassificationSource, ModeClassification, TrainingModeClassifier};
