use super::types::State;
use crate::event_bus::{EventBus, OrchestratorEvent};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Per-run bookkeeping.
///
/// Created when a run starts and owned by that run alone. Transitions only
/// ever move to [`State::successor`], so a run cannot skip or repeat a state.
#[derive(Debug)]
pub struct ExecutionRecord {
    execution_id: Uuid,
    started_at: DateTime<Utc>,
    start: Instant,
    state: State,
}

impl ExecutionRecord {
    /// Start a new record in [`State::Idle`] with a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            started_at: Utc::now(),
            start: Instant::now(),
            state: State::Idle,
        }
    }

    /// Run identifier
    #[must_use]
    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    /// Wall-clock start time
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Time since the run started
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time since the run started, in whole milliseconds
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Move to the next state and publish the transition.
    pub(crate) fn advance(&mut self, bus: &EventBus) -> State {
        let from = self.state;
        let to = from.successor();
        self.state = to;

        debug!(execution_id = %self.execution_id, %from, %to, "State changed");
        bus.publish(OrchestratorEvent::StateChanged {
            execution_id: self.execution_id,
            from,
            to,
        });
        to
    }
}

impl Default for ExecutionRecord {
    fn default() -> Self {
        Self::new()
    }
}
