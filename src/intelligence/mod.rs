// ABOUTME: Intelligence module re-exports from formscore-intelligence plus datastore-backed services
// ABOUTME: Trainer, evaluator, and activity pipeline live here because they need the datastore
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Intelligence Module
//!
//! Pure algorithms (regression, deviation rating, training-mode
//! classification, integrated scoring) come from `formscore-intelligence`.
//! The services below bind them to a [`PerformanceDataStore`](crate::database::PerformanceDataStore).

pub use formscore_intelligence::*;

/// Rolling-window baseline training
pub mod baseline_trainer;
/// Per-metric evaluation against the latest available baseline
pub mod evaluator;
/// Whole-activity evaluation and persistence
pub mod activity_evaluation;

pub use activity_evaluation::{ActivityEvaluation, ActivityEvaluationService};
pub use baseline_trainer::{BaselineTrainer, SkipReason, TrainingOutcome};
pub use evaluator::Evaluator;
