// ABOUTME: Core data models for baselines, samples, and evaluations
// ABOUTME: Re-exports the metric catalogue, condition groups, and record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

mod baseline;
mod condition;
mod evaluation;
mod metric;
mod training_mode;

pub use baseline::{BaselineRecord, MetricSample};
pub use condition::ConditionGroup;
pub use evaluation::{ActivityContext, EvaluationRecord, EvaluationResult, Rating};
pub use metric::{IndependentVariable, MetricKind, MetricSlot, Polarity};
pub use training_mode::TrainingMode;
