// ABOUTME: SQLite implementation of the performance datastore using a sqlx connection pool
// ABOUTME: Baselines are insert-only rows; evaluations are upserted as JSON keyed by activity id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use formscore_core::errors::DatabaseError;
use formscore_core::models::{
    ActivityContext, BaselineRecord, ConditionGroup, EvaluationRecord, MetricKind, MetricSample,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};
use uuid::Uuid;

use super::PerformanceDataStore;
use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Datastore backed by a `SQLite` database
#[derive(Clone)]
pub struct SqliteDataStore {
    pool: Pool<Sqlite>,
}

impl SqliteDataStore {
    /// Open the database and run migrations
    ///
    /// In-memory databases are held on a single connection that is never
    /// recycled, since each `SQLite` memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or migration fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let connect_options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| DatabaseError::ConnectionError {
                context: format!("Invalid database URL '{url}': {e}"),
            })?
            .create_if_missing(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DatabaseError::ConnectionError {
                context: format!("Failed to open {url}: {e}"),
            })?;

        let store = Self { pool };
        store.migrate().await?;
        info!(database = %url, "SQLite performance datastore ready");
        Ok(store)
    }

    /// Open the database named by a URL string
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unsupported or the database cannot be opened
    pub async fn connect(url: &str) -> AppResult<Self> {
        Self::new(&DatabaseUrl::parse_url(url)?).await
    }

    /// Create tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS activities (
                activity_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                condition_group TEXT NOT NULL,
                started_at TEXT NOT NULL,
                training_type_label TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create activities table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS metric_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                condition_group TEXT NOT NULL,
                metric TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                independent_value REAL NOT NULL,
                dependent_value REAL NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create metric_samples table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_metric_samples_key
             ON metric_samples(user_id, condition_group, metric, recorded_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create metric_samples index: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS activity_measurements (
                activity_id TEXT NOT NULL,
                metric TEXT NOT NULL,
                actual_value REAL,
                independent_value REAL,
                PRIMARY KEY (activity_id, metric)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create activity_measurements table: {e}"))
        })?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS baselines (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                condition_group TEXT NOT NULL,
                metric TEXT NOT NULL,
                coef_a REAL NOT NULL,
                coef_b REAL NOT NULL,
                rmse REAL NOT NULL,
                sample_count INTEGER NOT NULL,
                period_start TEXT NOT NULL,
                period_end TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create baselines table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_baselines_key
             ON baselines(user_id, condition_group, metric, period_end)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create baselines index: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS evaluations (
                activity_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                condition_group TEXT NOT NULL,
                training_mode TEXT NOT NULL,
                integrated_score REAL,
                as_of TEXT NOT NULL,
                evaluated_at TEXT NOT NULL,
                record_json TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create evaluations table: {e}")))?;

        debug!("Performance datastore schema migrated");
        Ok(())
    }

    /// Register an activity and its raw training-type label
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn add_activity(
        &self,
        context: &ActivityContext,
        training_type_label: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO activities (activity_id, user_id, condition_group, started_at, training_type_label)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(activity_id) DO UPDATE SET
                user_id = excluded.user_id,
                condition_group = excluded.condition_group,
                started_at = excluded.started_at,
                training_type_label = excluded.training_type_label
            ",
        )
        .bind(&context.activity_id)
        .bind(&context.user_id)
        .bind(context.condition_group.as_str())
        .bind(format_timestamp(context.started_at))
        .bind(training_type_label)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store activity: {e}")))?;
        Ok(())
    }

    /// Add one training sample
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn add_sample(
        &self,
        user_id: &str,
        metric: MetricKind,
        sample: &MetricSample,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO metric_samples
                (user_id, condition_group, metric, recorded_at, independent_value, dependent_value)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user_id)
        .bind(sample.condition_group.as_str())
        .bind(metric.as_str())
        .bind(format_timestamp(sample.timestamp))
        .bind(sample.independent_value)
        .bind(sample.dependent_value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store metric sample: {e}")))?;
        Ok(())
    }

    /// Set the measured and predictor values of `metric` for an activity
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn set_measurement(
        &self,
        activity_id: &str,
        metric: MetricKind,
        actual: Option<f64>,
        independent: Option<f64>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO activity_measurements (activity_id, metric, actual_value, independent_value)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(activity_id, metric) DO UPDATE SET
                actual_value = excluded.actual_value,
                independent_value = excluded.independent_value
            ",
        )
        .bind(activity_id)
        .bind(metric.as_str())
        .bind(actual)
        .bind(independent)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store measurement: {e}")))?;
        Ok(())
    }

    async fn measurement_column(
        &self,
        column: MeasurementColumn,
        activity_id: &str,
        metric: MetricKind,
    ) -> AppResult<Option<f64>> {
        let query = match column {
            MeasurementColumn::Actual => {
                "SELECT actual_value AS value FROM activity_measurements
                 WHERE activity_id = $1 AND metric = $2"
            }
            MeasurementColumn::Independent => {
                "SELECT independent_value AS value FROM activity_measurements
                 WHERE activity_id = $1 AND metric = $2"
            }
        };
        let row = sqlx::query(query)
            .bind(activity_id)
            .bind(metric.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to read measurement: {e}")))?;

        match row {
            Some(row) => Ok(row.try_get::<Option<f64>, _>("value").map_err(DatabaseError::from)?),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Copy)]
enum MeasurementColumn {
    Actual,
    Independent,
}

#[async_trait]
impl PerformanceDataStore for SqliteDataStore {
    async fn query_samples(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<MetricSample>> {
        let rows = sqlx::query(
            r"
            SELECT condition_group, recorded_at, independent_value, dependent_value
            FROM metric_samples
            WHERE user_id = $1 AND condition_group = $2 AND metric = $3
              AND substr(recorded_at, 1, 10) BETWEEN $4 AND $5
            ORDER BY recorded_at
            ",
        )
        .bind(user_id)
        .bind(condition_group.as_str())
        .bind(metric.as_str())
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query metric samples: {e}")))?;

        rows.iter().map(row_to_sample).collect()
    }

    async fn query_activity_measurement(
        &self,
        activity_id: &str,
        metric: MetricKind,
    ) -> AppResult<Option<f64>> {
        self.measurement_column(MeasurementColumn::Actual, activity_id, metric)
            .await
    }

    async fn query_activity_independent_value(
        &self,
        activity_id: &str,
        metric: MetricKind,
    ) -> AppResult<Option<f64>> {
        self.measurement_column(MeasurementColumn::Independent, activity_id, metric)
            .await
    }

    async fn query_raw_training_type_label(&self, activity_id: &str) -> AppResult<Option<String>> {
        let label: Option<Option<String>> = sqlx::query_scalar(
            "SELECT training_type_label FROM activities WHERE activity_id = $1",
        )
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read training type label: {e}")))?;
        Ok(label.flatten())
    }

    async fn get_activity_context(&self, activity_id: &str) -> AppResult<Option<ActivityContext>> {
        let row = sqlx::query(
            "SELECT activity_id, user_id, condition_group, started_at
             FROM activities WHERE activity_id = $1",
        )
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read activity: {e}")))?;

        row.as_ref().map(row_to_activity).transpose()
    }

    async fn get_latest_baseline(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
        as_of: NaiveDate,
    ) -> AppResult<Option<BaselineRecord>> {
        let row = sqlx::query(
            r"
            SELECT * FROM baselines
            WHERE user_id = $1 AND condition_group = $2 AND metric = $3
              AND period_end <= $4
            ORDER BY period_end DESC, created_at DESC, rowid DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(condition_group.as_str())
        .bind(metric.as_str())
        .bind(as_of.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to query latest baseline: {e}")))?;

        row.as_ref().map(row_to_baseline).transpose()
    }

    async fn list_baselines(
        &self,
        user_id: &str,
        condition_group: ConditionGroup,
        metric: MetricKind,
    ) -> AppResult<Vec<BaselineRecord>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM baselines
            WHERE user_id = $1 AND condition_group = $2 AND metric = $3
            ORDER BY rowid
            ",
        )
        .bind(user_id)
        .bind(condition_group.as_str())
        .bind(metric.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list baselines: {e}")))?;

        rows.iter().map(row_to_baseline).collect()
    }

    async fn insert_baseline(&self, record: &BaselineRecord) -> AppResult<()> {
        let sample_count = i64::try_from(record.sample_count)
            .map_err(|_| AppError::invalid_input("Baseline sample count exceeds i64"))?;

        sqlx::query(
            r"
            INSERT INTO baselines
                (id, user_id, condition_group, metric, coef_a, coef_b, rmse,
                 sample_count, period_start, period_end, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(record.id.to_string())
        .bind(&record.user_id)
        .bind(record.condition_group.as_str())
        .bind(record.metric.as_str())
        .bind(record.coef_a)
        .bind(record.coef_b)
        .bind(record.rmse)
        .bind(sample_count)
        .bind(record.period_start.to_string())
        .bind(record.period_end.to_string())
        .bind(format_timestamp(record.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert baseline: {e}")))?;
        Ok(())
    }

    async fn upsert_evaluation(&self, record: &EvaluationRecord) -> AppResult<()> {
        let record_json =
            serde_json::to_string(record).map_err(|source| DatabaseError::SerializationError {
                context: "evaluation record",
                source,
            })?;

        sqlx::query(
            r"
            INSERT INTO evaluations
                (activity_id, user_id, condition_group, training_mode,
                 integrated_score, as_of, evaluated_at, record_json)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT(activity_id) DO UPDATE SET
                user_id = excluded.user_id,
                condition_group = excluded.condition_group,
                training_mode = excluded.training_mode,
                integrated_score = excluded.integrated_score,
                as_of = excluded.as_of,
                evaluated_at = excluded.evaluated_at,
                record_json = excluded.record_json
            ",
        )
        .bind(&record.activity_id)
        .bind(&record.user_id)
        .bind(record.condition_group.as_str())
        .bind(record.training_mode.as_str())
        .bind(record.integrated_score)
        .bind(record.as_of.to_string())
        .bind(format_timestamp(record.evaluated_at))
        .bind(record_json)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert evaluation: {e}")))?;
        Ok(())
    }

    async fn get_evaluation(&self, activity_id: &str) -> AppResult<Option<EvaluationRecord>> {
        let record_json: Option<String> =
            sqlx::query_scalar("SELECT record_json FROM evaluations WHERE activity_id = $1")
                .bind(activity_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to read evaluation: {e}")))?;

        record_json
            .map(|json| {
                serde_json::from_str(&json).map_err(|source| {
                    AppError::from(DatabaseError::SerializationError {
                        context: "evaluation record",
                        source,
                    })
                })
            })
            .transpose()
    }
}

/// RFC 3339 in UTC with fixed precision, so text order is time order
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn corrupt(table: &'static str, reason: impl Into<String>) -> AppError {
    DatabaseError::CorruptRow {
        table,
        reason: reason.into(),
    }
    .into()
}

fn parse_timestamp(table: &'static str, raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(table, format!("bad timestamp '{raw}': {e}")))
}

fn parse_date(table: &'static str, raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| corrupt(table, format!("bad date '{raw}': {e}")))
}

fn parse_group(table: &'static str, raw: &str) -> AppResult<ConditionGroup> {
    raw.parse()
        .map_err(|e: AppError| corrupt(table, e.message))
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    Ok(row.try_get(column).map_err(DatabaseError::from)?)
}

fn row_to_sample(row: &SqliteRow) -> AppResult<MetricSample> {
    let group: String = get(row, "condition_group")?;
    let recorded_at: String = get(row, "recorded_at")?;
    Ok(MetricSample {
        condition_group: parse_group("metric_samples", &group)?,
        timestamp: parse_timestamp("metric_samples", &recorded_at)?,
        independent_value: get(row, "independent_value")?,
        dependent_value: get(row, "dependent_value")?,
    })
}

fn row_to_activity(row: &SqliteRow) -> AppResult<ActivityContext> {
    let group: String = get(row, "condition_group")?;
    let started_at: String = get(row, "started_at")?;
    Ok(ActivityContext {
        activity_id: get(row, "activity_id")?,
        user_id: get(row, "user_id")?,
        condition_group: parse_group("activities", &group)?,
        started_at: parse_timestamp("activities", &started_at)?,
    })
}

fn row_to_baseline(row: &SqliteRow) -> AppResult<BaselineRecord> {
    let id: String = get(row, "id")?;
    let group: String = get(row, "condition_group")?;
    let metric: String = get(row, "metric")?;
    let sample_count: i64 = get(row, "sample_count")?;
    let period_start: String = get(row, "period_start")?;
    let period_end: String = get(row, "period_end")?;
    let created_at: String = get(row, "created_at")?;

    Ok(BaselineRecord {
        id: Uuid::parse_str(&id).map_err(|e| corrupt("baselines", format!("bad id: {e}")))?,
        user_id: get(row, "user_id")?,
        condition_group: parse_group("baselines", &group)?,
        metric: MetricKind::from_str(&metric).map_err(|e| corrupt("baselines", e.message))?,
        coef_a: get(row, "coef_a")?,
        coef_b: get(row, "coef_b")?,
        rmse: get(row, "rmse")?,
        sample_count: usize::try_from(sample_count)
            .map_err(|_| corrupt("baselines", format!("negative sample_count {sample_count}")))?,
        period_start: parse_date("baselines", &period_start)?,
        period_end: parse_date("baselines", &period_end)?,
        created_at: parse_timestamp("baselines", &created_at)?,
    })
}
