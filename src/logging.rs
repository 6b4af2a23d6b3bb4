// ABOUTME: Logging configuration and structured tracing subscriber setup
// ABOUTME: Reads RUST_LOG and LOG_FORMAT to select filter level and json, pretty, or compact output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Structured logging for the evaluation engine

use std::env;
use std::io;

use anyhow::{anyhow, Result};
use formscore_core::constants::service_names;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name reported at startup
    pub service_name: String,
    /// Service version reported at startup
    pub service_version: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` lines for log shipping
    Json,
    /// Human readable multi-field output
    Pretty,
    /// Single-line output
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            service_name: service_names::FORMSCORE_ENGINE.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        Self {
            level,
            format,
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::FORMSCORE_ENGINE.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
        }
    }

    /// Build the filter used by [`Self::init`]
    ///
    /// An explicit `RUST_LOG` is used verbatim. Otherwise the configured level
    /// applies, `sqlx` is held at `warn` unless the level names it, and a bare
    /// level is also pinned on the `formscore` target.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        if let Ok(directives) = env::var("RUST_LOG") {
            return EnvFilter::new(directives);
        }

        let mut filter = EnvFilter::new(&self.level);
        // sqlx logs every statement at info
        if !self.level.contains("sqlx") {
            if let Ok(directive) = "sqlx=warn".parse() {
                filter = filter.add_directive(directive);
            }
        }
        if let Ok(level) = self.level.trim().parse::<LevelFilter>() {
            if let Ok(directive) = format!("formscore={level}").parse() {
                filter = filter.add_directive(directive);
            }
        }
        filter
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber has already been installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events)
                        .json(),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stdout)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            log.level = %self.level,
            log.format = ?self.format,
            "FormScore engine logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from the environment
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
