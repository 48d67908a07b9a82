//! Orchestrator helper methods
//!
//! - Phase-boundary checks (deadline, cancellation)
//! - Failure bookkeeping
//! - `RunGuard`, which settles a run whose future is dropped or panics

use crate::error::{ExecutionError, OrchestrationError, PhaseError};
use crate::event_bus::OrchestratorEvent;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use super::core::Orchestrator;
use super::record::ExecutionRecord;

impl Orchestrator {
    /// Fail the run if it was cancelled or ran past its deadline.
    pub(crate) fn check_boundary(
        &self,
        record: &ExecutionRecord,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<(), ExecutionError> {
        if cancel.is_cancelled() {
            return Err(ExecutionError::Cancelled);
        }

        if let Some(limit) = deadline {
            let elapsed = record.elapsed();
            if elapsed > limit {
                return Err(ExecutionError::DeadlineExceeded {
                    elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    limit_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                });
            }
        }

        Ok(())
    }

    /// Count the failure, publish the error event and build the caller's error.
    pub(crate) fn fail(&self, record: &ExecutionRecord, source: PhaseError) -> OrchestrationError {
        self.statistics.record_failure();

        let execution_id = record.execution_id();
        let state = record.state();
        warn!(
            execution_id = %execution_id,
            state = %state,
            kind = ?source.kind(),
            error = %source,
            duration_ms = record.elapsed_ms(),
            "Run failed"
        );

        self.event_bus.publish(OrchestratorEvent::Error {
            execution_id,
            state,
            kind: source.kind(),
            cause: source.to_string(),
        });

        OrchestrationError {
            execution_id,
            state,
            source,
        }
    }
}

/// Owns a run's record and its slot in `active_executions`.
///
/// Dropping the guard always frees the slot. A guard dropped before
/// [`RunGuard::settle`] counts the run as a cancelled failure and publishes
/// its error event.
pub(crate) struct RunGuard<'a> {
    orchestrator: &'a Orchestrator,
    pub(crate) record: ExecutionRecord,
    settled: bool,
}

impl<'a> RunGuard<'a> {
    /// Register a fresh run and its cancel token.
    pub(crate) fn new(orchestrator: &'a Orchestrator, cancel: CancellationToken) -> Self {
        let record = ExecutionRecord::new();
        orchestrator
            .active_executions
            .insert(record.execution_id(), cancel);
        Self {
            orchestrator,
            record,
            settled: false,
        }
    }

    pub(crate) fn execution_id(&self) -> Uuid {
        self.record.execution_id()
    }

    /// Free the slot. The caller does the run's bookkeeping from here on.
    pub(crate) fn settle(&mut self) {
        self.settled = true;
        self.orchestrator
            .active_executions
            .remove(&self.record.execution_id());
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.settle();
        // abandoned mid-phase
        let _ = self
            .orchestrator
            .fail(&self.record, ExecutionError::Cancelled.into());
    }
}
