//! Phase functions - the pluggable units a run is composed of.
//!
//! The engine depends only on the three traits below. Each has a default
//! implementation:
//!
//! - `analyzer`: [`KeywordAnalyzer`], rule-based intent classification
//! - `executor`: [`SiteExecutor`], site selection plus a [`SiteClient`] call
//! - `assessor`: [`LatencyAssessor`], deterministic quality scoring

mod analyzer;
mod assessor;
mod executor;
mod types;

pub use analyzer::{IntentRule, KeywordAnalyzer, GENERIC_INTENT};
pub use assessor::LatencyAssessor;
pub use executor::{LocalSiteClient, SiteClient, SiteExecutor};
pub use types::{
    AnalysisResult, Badge, ExecutionOutcome, QualityBadge, ResponseStatus, SiteResponse,
};

use crate::error::ExecutionError;
use crate::orchestrator::OrchestrationInput;
use async_trait::async_trait;

/// Classifies the intent behind a user input.
///
/// Rejection is expressed through `validated: false`, which the engine
/// turns into an intent validation failure.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze one input
    async fn analyze(&self, input: &OrchestrationInput) -> AnalysisResult;
}

/// Carries out an analyzed intent against a site.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute one analyzed intent
    async fn execute(&self, analysis: &AnalysisResult) -> Result<ExecutionOutcome, ExecutionError>;
}

/// Scores an execution outcome. Must be deterministic and infallible.
pub trait Assessor: Send + Sync {
    /// Assess one outcome
    fn assess(&self, outcome: &ExecutionOutcome) -> QualityBadge;
}
