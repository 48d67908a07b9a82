//! Orchestrator run loop
//!
//! Contains the `orchestrate` method: IDLE → ANALYZING → EXECUTING →
//! ASSESSING → MONITORING → IDLE, with a transition event before each phase.

use crate::error::{IntentValidationError, OrchestrationError, PhaseError};
use crate::phases::AnalysisResult;
use chrono::Utc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::OrchestrationInput;
use super::core::Orchestrator;
use super::helpers::RunGuard;
use super::record::ExecutionRecord;
use super::types::{OrchestrationResult, RunMetrics};

impl Orchestrator {
    /// Run one input through every phase.
    ///
    /// Any phase failure aborts the run: later phases are skipped, the
    /// failure is counted, one error event is published and the failure is
    /// returned wrapped in [`OrchestrationError`]. A run whose future is
    /// dropped before it finishes is counted and reported the same way, as
    /// [`ExecutionError::Cancelled`](crate::error::ExecutionError::Cancelled).
    #[tracing::instrument(skip(self, input), fields(execution_id = tracing::field::Empty))]
    pub async fn orchestrate(
        &self,
        input: OrchestrationInput,
    ) -> Result<OrchestrationResult, OrchestrationError> {
        let cancel_token = CancellationToken::new();
        let mut run = RunGuard::new(self, cancel_token.clone());
        let execution_id = run.execution_id();
        tracing::Span::current().record("execution_id", tracing::field::display(execution_id));

        let deadline = input.deadline().or_else(|| self.config.deadline());
        info!(
            execution_id = %execution_id,
            input_len = input.text().len(),
            deadline_ms = deadline.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            "Starting run"
        );

        let outcome = self
            .run_phases(&mut run.record, &input, deadline, &cancel_token)
            .await;
        run.settle();

        match outcome {
            Ok(result) => {
                self.statistics.record_success(result.execution.latency_ms);
                run.record.advance(&self.event_bus);
                info!(
                    execution_id = %execution_id,
                    site = %result.execution.selected_site,
                    quality = %result.quality.badge,
                    duration_ms = result.duration_ms,
                    "Run completed"
                );
                Ok(result)
            }
            Err(source) => Err(self.fail(&run.record, source)),
        }
    }

    async fn run_phases(
        &self,
        record: &mut ExecutionRecord,
        input: &OrchestrationInput,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationResult, PhaseError> {
        // ANALYZING
        record.advance(&self.event_bus);
        let analysis = self.analyzer.analyze(input).await;
        if !analysis.validated {
            return Err(rejection(&analysis).into());
        }
        debug!(intent = %analysis.intent, confidence = analysis.confidence, "Intent validated");
        self.check_boundary(record, deadline, cancel)?;

        // EXECUTING
        record.advance(&self.event_bus);
        let execution = self.executor.execute(&analysis).await?;
        debug!(
            site = %execution.selected_site,
            latency_ms = execution.latency_ms,
            "Execution finished"
        );
        self.check_boundary(record, deadline, cancel)?;

        // ASSESSING
        record.advance(&self.event_bus);
        let quality = self.assessor.assess(&execution);
        self.check_boundary(record, deadline, cancel)?;

        // MONITORING
        record.advance(&self.event_bus);
        let metrics = RunMetrics {
            latency_ms: execution.latency_ms,
            quality: quality.badge,
            timestamp: Utc::now(),
            duration_ms: record.elapsed_ms(),
        };

        Ok(OrchestrationResult {
            success: true,
            execution_id: record.execution_id(),
            duration_ms: record.elapsed_ms(),
            analysis,
            execution,
            quality,
            metrics,
        })
    }
}

fn rejection(analysis: &AnalysisResult) -> IntentValidationError {
    let reason = if analysis.intent.is_empty() {
        "no intent found in input".to_string()
    } else {
        format!(
            "intent '{}' not validated (confidence {:.2})",
            analysis.intent, analysis.confidence
        )
    };

    IntentValidationError {
        intent: analysis.intent.clone(),
        confidence: analysis.confidence,
        reason,
    }
}
