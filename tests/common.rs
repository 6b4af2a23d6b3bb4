// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, datastore construction, and seeded synthetic samples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]
//! Shared test utilities for `formscore`

use std::sync::{Arc, Once};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use formscore::database::InMemoryDataStore;
#[cfg(feature = "sqlite")]
use formscore::database::SqliteDataStore;
use formscore::models::{ActivityContext, ConditionGroup, MetricKind, MetricSample};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory store
pub fn create_memory_store() -> Arc<InMemoryDataStore> {
    init_test_logging();
    Arc::new(InMemoryDataStore::new())
}

/// Fresh migrated `SQLite` store on an in-memory database
#[cfg(feature = "sqlite")]
pub async fn create_sqlite_store() -> Arc<SqliteDataStore> {
    init_test_logging();
    Arc::new(SqliteDataStore::connect("sqlite::memory:").await.unwrap())
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at_noon(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
}

pub fn activity(activity_id: &str, user_id: &str, group: ConditionGroup, day: NaiveDate) -> ActivityContext {
    ActivityContext {
        activity_id: activity_id.to_owned(),
        user_id: user_id.to_owned(),
        condition_group: group,
        started_at: at_noon(day),
    }
}

/// Deterministic generator of `y = a + b*x + noise` samples
pub struct SampleGenerator {
    rng: ChaCha8Rng,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Standard normal draw (Box-Muller)
    pub fn standard_normal(&mut self) -> f64 {
        let u1: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.rng.gen_range(0.0..1.0);
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// `count` samples starting at noon on `first_day`, spaced `spacing` apart,
    /// with `x` drawn uniformly from `x_range`
    #[allow(clippy::too_many_arguments)]
    pub fn linear(
        &mut self,
        group: ConditionGroup,
        first_day: NaiveDate,
        spacing: Duration,
        count: usize,
        (a, b): (f64, f64),
        x_range: std::ops::Range<f64>,
        noise_sd: f64,
    ) -> Vec<MetricSample> {
        let start = at_noon(first_day);
        (0..count)
            .map(|i| {
                let x = self.rng.gen_range(x_range.clone());
                let noise = noise_sd * self.standard_normal();
                MetricSample {
                    condition_group: group,
                    timestamp: start + spacing * i as i32,
                    independent_value: x,
                    dependent_value: b.mul_add(x, a) + noise,
                }
            })
            .collect()
    }
}

/// One noiseless sample per day, `x` stepping evenly across `x_range`
pub fn exact_daily_samples(
    group: ConditionGroup,
    first_day: NaiveDate,
    count: usize,
    (a, b): (f64, f64),
    x_range: std::ops::Range<f64>,
) -> Vec<MetricSample> {
    let step = (x_range.end - x_range.start) / count as f64;
    (0..count)
        .map(|i| {
            let x = (i as f64).mul_add(step, x_range.start);
            MetricSample {
                condition_group: group,
                timestamp: at_noon(first_day) + Duration::days(i as i64),
                independent_value: x,
                dependent_value: b.mul_add(x, a),
            }
        })
        .collect()
}

pub fn seed_samples(store: &InMemoryDataStore, user_id: &str, metric: MetricKind, samples: &[MetricSample]) {
    for sample in samples {
        store.add_sample(user_id, metric, *sample);
    }
}
