// ABOUTME: Error types re-exported from the core crate for the engine crate
// ABOUTME: Keeps `crate::errors::AppError` paths stable across modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Unified error handling
//!
//! All fallible engine operations return [`AppResult`]. Datastore failures
//! arrive as [`DatabaseError`] and convert into [`AppError`] with `?`.

pub use formscore_core::errors::*;
