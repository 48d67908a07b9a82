//! Error types for shortcut-core
//!
//! Run failures are reported as [`OrchestrationError`], which wraps the
//! [`PhaseError`] raised by the phase that aborted the run. Everything that
//! is not a run failure (configuration, setup) uses the crate-level [`Error`].

use crate::orchestrator::State;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("invalid configuration: {field}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// A run failed
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),

    /// Internal error (serialization, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// The analyzer rejected the input.
///
/// Recoverable only by resubmitting different input.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("intent validation failed: {reason}")]
pub struct IntentValidationError {
    /// Intent the analyzer settled on (may be empty)
    pub intent: String,
    /// Confidence reported by the analyzer
    pub confidence: f64,
    /// Why the intent was rejected
    pub reason: String,
}

/// The execution phase failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The selected site reported a fault
    #[error("site '{site}' failed: {message}")]
    Backend {
        /// Site name
        site: String,
        /// Failure description
        message: String,
    },

    /// The selected site cannot take work
    #[error("invalid site selection '{site}': {reason}")]
    InvalidSelection {
        /// Site name
        site: String,
        /// Why the site was rejected
        reason: String,
    },

    /// The run deadline passed before the next phase could start
    #[error("deadline exceeded after {elapsed_ms}ms (limit {limit_ms}ms)")]
    DeadlineExceeded {
        /// Time spent in the run so far
        elapsed_ms: u64,
        /// Configured limit
        limit_ms: u64,
    },

    /// The run was cancelled by the caller
    #[error("run cancelled")]
    Cancelled,
}

/// Failure raised by a single phase of a run.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PhaseError {
    /// Analyzer produced `validated: false`
    #[error(transparent)]
    IntentValidation(#[from] IntentValidationError),

    /// Executor failed, or the run hit its deadline or was cancelled
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Coarse classification of a [`PhaseError`], carried on error events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`IntentValidationError`]
    IntentValidation,
    /// See [`ExecutionError`]
    Execution,
}

impl PhaseError {
    /// Classify the failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IntentValidation(_) => ErrorKind::IntentValidation,
            Self::Execution(_) => ErrorKind::Execution,
        }
    }
}

/// Failure surfaced to the caller of `orchestrate`.
///
/// Preserves the originating [`PhaseError`] as its `source()`.
#[derive(Debug, Clone, Error)]
#[error("orchestration {execution_id} failed while {state}: {source}")]
pub struct OrchestrationError {
    /// Identifier of the failed run
    pub execution_id: Uuid,
    /// State the run was in when it failed
    pub state: State,
    /// Original cause
    #[source]
    pub source: PhaseError,
}

impl OrchestrationError {
    /// Classify the underlying failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    /// The validation failure, if that is what aborted the run
    #[must_use]
    pub fn as_intent_validation(&self) -> Option<&IntentValidationError> {
        match &self.source {
            PhaseError::IntentValidation(e) => Some(e),
            PhaseError::Execution(_) => None,
        }
    }

    /// The execution failure, if that is what aborted the run
    #[must_use]
    pub fn as_execution(&self) -> Option<&ExecutionError> {
        match &self.source {
            PhaseError::Execution(e) => Some(e),
            PhaseError::IntentValidation(_) => None,
        }
    }
}

/// Trait for user-friendly error messages
///
/// Provides human-readable error messages and suggestions for fixing.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for OrchestrationError {
    fn user_message(&self) -> String {
        match &self.source {
            PhaseError::IntentValidation(e) => {
                format!("🧭 Could not understand the request: {}", e.reason)
            }
            PhaseError::Execution(ExecutionError::DeadlineExceeded { limit_ms, .. }) => {
                format!("⏳ The request took longer than {}ms.", limit_ms)
            }
            PhaseError::Execution(ExecutionError::Cancelled) => {
                "🛑 The request was cancelled.".to_string()
            }
            PhaseError::Execution(e) => format!("⚡ Execution failed: {}", e),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match &self.source {
            PhaseError::IntentValidation(_) => {
                Some("💡 Rephrase the request and try again.".to_string())
            }
            PhaseError::Execution(ExecutionError::InvalidSelection { site, .. }) => Some(format!(
                "💡 Enable site '{}' or pick another one with --site.",
                site
            )),
            PhaseError::Execution(ExecutionError::DeadlineExceeded { .. }) => Some(
                "💡 Raise orchestrator.max_execution_secs or pass a larger deadline_ms."
                    .to_string(),
            ),
            PhaseError::Execution(ExecutionError::Backend { .. }) => {
                Some("💡 Check the site configuration and try again.".to_string())
            }
            PhaseError::Execution(ExecutionError::Cancelled) => None,
        }
    }
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::InvalidConfig { field, message } => {
                format!("⚙️ Configuration error in '{}': {}", field, message)
            }
            Error::Orchestration(e) => e.user_message(),
            Error::Internal(msg) => format!("❌ Internal error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::InvalidConfig { field, .. } => Some(format!(
                "💡 Check the '{}' setting in config/default.toml or .env file.",
                field
            )),
            Error::Orchestration(e) => e.suggestion(),
            Error::Internal(_) => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &dyn UserFriendlyError) -> String {
    let mut output = error.user_message();

    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }

    output
}
