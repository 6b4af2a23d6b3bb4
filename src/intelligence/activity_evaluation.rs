// ABOUTME: End-to-end activity evaluation: per-metric ratings, training mode, integrated score, upsert
// ABOUTME: Each metric is evaluated independently so one missing sensor never fails the activity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use formscore_core::models::{EvaluationRecord, EvaluationResult, MetricKind};
use formscore_intelligence::{EngineConfig, IntegratedScore, IntegratedScorer, TrainingModeClassifier};
use tracing::info;

use super::evaluator::Evaluator;
use crate::database::PerformanceDataStore;
use crate::errors::{AppError, AppResult};

/// Stored record together with the score breakdown used to build it
#[derive(Debug, Clone)]
pub struct ActivityEvaluation {
    /// Record as upserted
    pub record: EvaluationRecord,
    /// Slot-by-slot breakdown; absent when no slot metric was evaluated
    pub breakdown: Option<IntegratedScore>,
}

/// Runs the full evaluation of one activity and persists the result
pub struct ActivityEvaluationService {
    store: Arc<dyn PerformanceDataStore>,
    evaluator: Evaluator,
    scorer: IntegratedScorer,
}

impl ActivityEvaluationService {
    /// Create a service from explicit engine configuration
    #[must_use]
    pub fn new(store: Arc<dyn PerformanceDataStore>, config: &EngineConfig) -> Self {
        Self {
            evaluator: Evaluator::new(Arc::clone(&store), config.rating),
            scorer: IntegratedScorer::new(config.scoring.clone()),
            store,
        }
    }

    /// Create a service using the global engine configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the environment overrides are invalid
    pub fn with_global_config(store: Arc<dyn PerformanceDataStore>) -> AppResult<Self> {
        Ok(Self::new(store, EngineConfig::try_global()?))
    }

    /// Evaluate and upsert an activity, returning the stored record
    ///
    /// `as_of` defaults to the activity's start date, so only baselines whose
    /// window closed on or before that day are used.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown activity and propagates
    /// datastore failures
    pub async fn evaluate_activity(
        &self,
        activity_id: &str,
        as_of: Option<NaiveDate>,
    ) -> AppResult<EvaluationRecord> {
        Ok(self.evaluate_activity_detailed(activity_id, as_of).await?.record)
    }

    /// [`evaluate_activity`](Self::evaluate_activity) returning the score breakdown too
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown activity and propagates
    /// datastore failures
    pub async fn evaluate_activity_detailed(
        &self,
        activity_id: &str,
        as_of: Option<NaiveDate>,
    ) -> AppResult<ActivityEvaluation> {
        let context = self
            .store
            .get_activity_context(activity_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Activity {activity_id}")))?;
        let as_of = as_of.unwrap_or_else(|| context.started_at.date_naive());

        let mut results = Vec::with_capacity(MetricKind::ALL.len());
        for metric in MetricKind::ALL {
            let result = self
                .evaluator
                .evaluate_in_context(&context, metric, as_of)
                .await?
                .unwrap_or_else(|| EvaluationResult::not_evaluated(metric));
            results.push(result);
        }

        let label = self.store.query_raw_training_type_label(activity_id).await?;
        let classification = TrainingModeClassifier::classify_with_source(label.as_deref());

        let breakdown = self.scorer.integrate(&results, classification.mode);

        let record = EvaluationRecord {
            activity_id: context.activity_id.clone(),
            user_id: context.user_id.clone(),
            condition_group: context.condition_group,
            results,
            integrated_score: breakdown.as_ref().map(|b| b.score),
            training_mode: classification.mode,
            mode_fallback: classification.is_fallback(),
            as_of,
            evaluated_at: Utc::now(),
        };
        self.store.upsert_evaluation(&record).await?;

        info!(
            activity_id,
            user_id = %record.user_id,
            condition_group = %record.condition_group,
            training_mode = %record.training_mode,
            mode_fallback = record.mode_fallback,
            integrated_score = ?record.integrated_score,
            not_evaluated = record.not_evaluated().len(),
            %as_of,
            "Activity evaluated"
        );

        Ok(ActivityEvaluation { record, breakdown })
    }

    /// Previously stored evaluation for an activity
    ///
    /// # Errors
    ///
    /// Propagates datastore failures
    pub async fn get_evaluation(&self, activity_id: &str) -> AppResult<Option<EvaluationRecord>> {
        self.store.get_evaluation(activity_id).await
    }
}
