// ABOUTME: Core types and constants for the FormScore adaptive baseline engine
// ABOUTME: Foundation crate with error handling, metric catalogue, and record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # `FormScore` Core
//!
//! Foundation crate shared by the intelligence algorithms and the engine.
//! It changes rarely, which keeps incremental builds of the workspace fast.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and `DatabaseError`
//! - **constants**: defaults for baseline windows, rating tiers, and weights
//! - **models**: metric catalogue, condition groups, baseline and evaluation records

/// Unified error handling with standard error codes
pub mod errors;

/// Engine constants organized by domain
pub mod constants;

/// Core data models (`MetricKind`, `BaselineRecord`, `EvaluationRecord`, ...)
pub mod models;
