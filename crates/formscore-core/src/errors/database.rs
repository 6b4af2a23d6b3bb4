// ABOUTME: Structured error types for datastore operations
// ABOUTME: Wraps sqlx failures and row decoding problems with query context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use thiserror::Error;

/// Errors raised by `PerformanceDataStore` implementations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Could not open or migrate the database
    #[error("Database connection failed: {context}")]
    ConnectionError {
        /// What was being attempted
        context: String,
    },

    /// A query or statement failed
    #[error("Database query failed: {context}")]
    QueryError {
        /// Which query failed and why
        context: String,
    },

    /// A stored row could not be decoded into a domain type
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow {
        /// Table the row came from
        table: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// JSON payload (de)serialization failed
    #[error("Serialization failed for {context}")]
    SerializationError {
        /// Which record was being (de)serialized
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        Self::QueryError {
            context: error.to_string(),
        }
    }
}
