//! Shortcut Core - Orchestration Engine
//!
//! This crate drives a single user input through a fixed sequence of phases
//! and keeps the bookkeeping around it:
//! - Registry: named execution sites and site selection
//! - Phases: pluggable analyzer, executor and assessor
//! - Orchestrator: the per-run state machine
//! - Stats: aggregate counters shared by all runs
//! - Event bus: lifecycle events for external listeners

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event_bus;
pub mod orchestrator;
pub mod phases;
pub mod registry;
pub mod stats;

pub use error::{
    format_error_for_cli, Error, ErrorKind, ExecutionError, IntentValidationError,
    OrchestrationError, PhaseError, Result, UserFriendlyError,
};
pub use event_bus::{EventBus, ListenerHandle, OrchestratorEvent, Subscription};
pub use orchestrator::{
    ExecutionRecord, OrchestrationInput, OrchestrationResult, Orchestrator, OrchestratorConfig,
    RunMetrics, State,
};
pub use phases::{
    AnalysisResult, Analyzer, Assessor, Badge, ExecutionOutcome, Executor, IntentRule,
    KeywordAnalyzer, LatencyAssessor, LocalSiteClient, QualityBadge, ResponseStatus, SiteClient,
    SiteExecutor, SiteResponse,
};
pub use registry::{SelectionPolicy, SiteConfig, SiteRegistry, DEFAULT_SITE};
pub use stats::{Statistics, StatisticsAggregator};
