// ABOUTME: Database URL configuration for the SQLite-backed performance datastore
// ABOUTME: Parses sqlite file paths and the in-memory form used by tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use formscore_core::constants::env_config;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Type-safe database location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite`
    #[default]
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or names an unsupported scheme
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::missing_field("database_url"));
        }
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" || path_str.is_empty() {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.contains("://") {
            Err(AppError::config(format!(
                "Unsupported database URL scheme: '{s}'"
            )))
        } else {
            // Bare paths are SQLite files
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Read `FORMSCORE_DATABASE_URL`, falling back to in-memory
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set to an unsupported URL
    pub fn from_env() -> AppResult<Self> {
        env::var(env_config::DATABASE_URL).map_or_else(
            |_| Self::parse_url(env_config::DEFAULT_DATABASE_URL),
            |url| Self::parse_url(&url),
        )
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => env_config::DEFAULT_DATABASE_URL.into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}
