// ABOUTME: Main library entry point for the FormScore performance baseline and evaluation engine
// ABOUTME: Wires pure scoring algorithms to a pluggable datastore for training and evaluation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # FormScore
//!
//! Adaptive per-athlete baselines for running form metrics, and evaluation
//! of individual activities against them.
//!
//! ## Flow
//!
//! - **Training**: [`BaselineTrainer`](intelligence::BaselineTrainer) fits
//!   `metric = a + b * predictor` over a rolling window of samples and appends
//!   a new baseline row.
//! - **Evaluation**: [`Evaluator`](intelligence::Evaluator) predicts the
//!   expected value from the latest baseline available as of a date and rates
//!   the sign-normalized deviation on five tiers.
//! - **Scoring**: [`ActivityEvaluationService`](intelligence::ActivityEvaluationService)
//!   evaluates every metric, classifies the training mode, combines the
//!   results into an integrated score, and upserts the evaluation record.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use formscore::database::SqliteDataStore;
//! use formscore::errors::AppResult;
//! use formscore::intelligence::ActivityEvaluationService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = Arc::new(SqliteDataStore::connect("sqlite:formscore.db").await?);
//!     let service = ActivityEvaluationService::with_global_config(store)?;
//!     let record = service.evaluate_activity("activity-1", None).await?;
//!     println!("integrated score: {:?}", record.integrated_score);
//!     Ok(())
//! }
//! ```

/// Engine and process configuration
pub mod config;

/// Datastore abstraction and implementations
pub mod database;

/// Unified error handling
pub mod errors;

/// Baseline training, evaluation, and scoring
pub mod intelligence;

/// Structured logging setup
pub mod logging;

/// Domain constants
pub use formscore_core::constants;

/// Domain models
pub use formscore_core::models;
