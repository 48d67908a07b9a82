//! Orchestrator types
//!
//! - `State` for the run state machine
//! - `RunMetrics` recorded in the MONITORING phase
//! - `OrchestrationResult` returned by a successful run

use crate::phases::{AnalysisResult, Badge, ExecutionOutcome, QualityBadge};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Run state.
///
/// IDLE is both initial and terminal. A successful run visits every state
/// in order and returns to IDLE; a failed run stops where it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Not running
    Idle,
    /// Classifying the input
    Analyzing,
    /// Running against a site
    Executing,
    /// Scoring the outcome
    Assessing,
    /// Recording run metrics
    Monitoring,
}

impl State {
    /// The state a successful run moves to next.
    #[must_use]
    pub fn successor(self) -> Self {
        match self {
            Self::Idle => Self::Analyzing,
            Self::Analyzing => Self::Executing,
            Self::Executing => Self::Assessing,
            Self::Assessing => Self::Monitoring,
            Self::Monitoring => Self::Idle,
        }
    }

    /// Upper-case name, as used in events and logs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Analyzing => "ANALYZING",
            Self::Executing => "EXECUTING",
            Self::Assessing => "ASSESSING",
            Self::Monitoring => "MONITORING",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics recorded in the MONITORING phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Site call latency in milliseconds
    pub latency_ms: f64,
    /// Quality label of the run
    pub quality: Badge,
    /// When the metrics were recorded
    pub timestamp: DateTime<Utc>,
    /// Run duration up to this phase, in milliseconds
    pub duration_ms: u64,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    /// Always true; failures are returned as errors
    pub success: bool,
    /// Run identifier
    pub execution_id: Uuid,
    /// Total run duration in milliseconds
    pub duration_ms: u64,
    /// Analysis phase output
    pub analysis: AnalysisResult,
    /// Execution phase output
    pub execution: ExecutionOutcome,
    /// Assessment phase output
    pub quality: QualityBadge,
    /// Monitoring phase output
    pub metrics: RunMetrics,
}
