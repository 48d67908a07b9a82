//! Orchestrator configuration
//!
//! Contains configuration types for the orchestrator:
//! - `OrchestratorConfig` for engine settings
//! - `OrchestrationInput` for one run's input and context

use crate::registry::SelectionPolicy;
use std::time::Duration;

/// Context key naming a preferred site
pub const CONTEXT_SITE: &str = "site";
/// Context key overriding the run deadline, in milliseconds
pub const CONTEXT_DEADLINE_MS: &str = "deadline_ms";

/// Input for one run
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationInput {
    /// User input (any JSON value)
    pub input: serde_json::Value,
    /// Caller-supplied context
    pub context: serde_json::Map<String, serde_json::Value>,
}

impl OrchestrationInput {
    /// Create an input with an empty context
    #[must_use]
    pub fn new(input: impl Into<serde_json::Value>) -> Self {
        Self {
            input: input.into(),
            context: serde_json::Map::new(),
        }
    }

    /// Replace the context
    #[must_use]
    pub fn with_context(mut self, context: serde_json::Map<String, serde_json::Value>) -> Self {
        self.context = context;
        self
    }

    /// Set one context entry
    #[must_use]
    pub fn with_context_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Ask for a specific site
    #[must_use]
    pub fn with_site(self, site: impl Into<String>) -> Self {
        self.with_context_value(CONTEXT_SITE, site.into())
    }

    /// Override the engine deadline for this run
    #[must_use]
    pub fn with_deadline(self, deadline: Duration) -> Self {
        let millis = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
        self.with_context_value(CONTEXT_DEADLINE_MS, millis)
    }

    /// The input rendered as text.
    ///
    /// Strings are used as-is, `null` is empty, anything else is JSON.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.input {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Preferred site from the context
    #[must_use]
    pub fn site(&self) -> Option<&str> {
        self.context.get(CONTEXT_SITE).and_then(|v| v.as_str())
    }

    /// Deadline override from the context
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.context
            .get(CONTEXT_DEADLINE_MS)
            .and_then(|v| v.as_u64())
            .map(Duration::from_millis)
    }
}

/// Configuration for the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Maximum run time in seconds, checked at phase boundaries (0 = no limit)
    pub max_execution_secs: u64,
    /// How the default executor picks a site
    pub selection_policy: SelectionPolicy,
    /// Event bus buffer per subscriber
    pub event_capacity: usize,
    /// Analyzer confidence below which input is rejected
    pub min_confidence: f64,
    /// Site latency tolerated before the assessor deducts points
    pub latency_budget_ms: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_execution_secs: 180,
            selection_policy: SelectionPolicy::FirstRegistered,
            event_capacity: 256,
            min_confidence: 0.3,
            latency_budget_ms: 500.0,
        }
    }
}

impl OrchestratorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run time limit in seconds (0 = no limit)
    #[must_use]
    pub fn with_max_execution_secs(mut self, secs: u64) -> Self {
        self.max_execution_secs = secs;
        self
    }

    /// Set the site selection policy
    #[must_use]
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Set the event bus capacity
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Set the minimum analyzer confidence
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Set the assessor latency budget
    #[must_use]
    pub fn with_latency_budget_ms(mut self, budget_ms: f64) -> Self {
        self.latency_budget_ms = budget_ms;
        self
    }

    /// The configured deadline, if any
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        (self.max_execution_secs > 0).then(|| Duration::from_secs(self.max_execution_secs))
    }
}
