//! Orchestrator - single-run state machine
//!
//! Drives one input through analysis, execution, assessment and metrics
//! recording, publishing a transition event per step and updating the
//! shared statistics once per run.
//!
//! # Module Structure
//!
//! - `types`: `State`, `OrchestrationResult`, `RunMetrics`
//! - `config`: `OrchestratorConfig`, `OrchestrationInput`
//! - `record`: per-run `ExecutionRecord`
//! - `core`: Orchestrator struct and builder methods
//! - `process`: the run itself
//! - `helpers`: phase-boundary checks and failure bookkeeping

mod config;
mod core;
mod helpers;
mod process;
mod record;
mod types;

#[cfg(test)]
mod tests;

// Re-export public types
pub use config::{OrchestrationInput, OrchestratorConfig};
pub use self::core::Orchestrator;
pub use record::ExecutionRecord;
pub use types::{OrchestrationResult, RunMetrics, State};
