use crate::error::ErrorKind;
use crate::orchestrator::State;
use serde::Serialize;
use uuid::Uuid;

/// Events emitted while a run moves through its phases.
///
/// Within one run, `StateChanged` events arrive in phase order. A failed run
/// ends with exactly one `Error` event instead of the next transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrchestratorEvent {
    /// The run entered a new state
    StateChanged {
        /// Run identifier
        execution_id: Uuid,
        /// State being left
        from: State,
        /// State being entered
        to: State,
    },
    /// The run failed
    Error {
        /// Run identifier
        execution_id: Uuid,
        /// State the run was in when it failed
        state: State,
        /// Failure classification
        kind: ErrorKind,
        /// Rendered cause
        cause: String,
    },
}

impl OrchestratorEvent {
    /// Get the execution_id from any event variant.
    #[must_use]
    pub fn execution_id(&self) -> Uuid {
        match self {
            Self::StateChanged { execution_id, .. } | Self::Error { execution_id, .. } => {
                *execution_id
            }
        }
    }

    /// The `(from, to)` pair of a transition event.
    #[must_use]
    pub fn transition(&self) -> Option<(State, State)> {
        match self {
            Self::StateChanged { from, to, .. } => Some((*from, *to)),
            Self::Error { .. } => None,
        }
    }

    /// Whether this is a failure event
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
