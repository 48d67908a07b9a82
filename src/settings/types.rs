//! Application configuration types

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shortcut_core::{OrchestratorConfig, SelectionPolicy, SiteConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub orchestrator: OrchestratorAppConfig,
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl AppConfig {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Orchestrator configuration (exposed to TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorAppConfig {
    /// Run time limit in seconds, checked at phase boundaries (0 = no limit)
    #[serde(default = "default_max_execution_secs")]
    pub max_execution_secs: u64,
    /// Site selection policy
    #[serde(default)]
    pub selection_policy: SelectionPolicy,
    /// Event bus buffer per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Analyzer confidence below which input is rejected
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Site latency tolerated before quality deductions
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: f64,
}

impl Default for OrchestratorAppConfig {
    fn default() -> Self {
        Self {
            max_execution_secs: default_max_execution_secs(),
            selection_policy: SelectionPolicy::default(),
            event_capacity: default_event_capacity(),
            min_confidence: default_min_confidence(),
            latency_budget_ms: default_latency_budget_ms(),
        }
    }
}

fn default_max_execution_secs() -> u64 {
    180
}
fn default_event_capacity() -> usize {
    256
}
fn default_min_confidence() -> f64 {
    0.3
}
fn default_latency_budget_ms() -> f64 {
    500.0
}

impl OrchestratorAppConfig {
    /// Validate and convert into the engine configuration.
    pub fn to_orchestrator_config(&self) -> shortcut_core::Result<OrchestratorConfig> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(invalid(
                "orchestrator.min_confidence",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.event_capacity == 0 {
            return Err(invalid("orchestrator.event_capacity", "must be at least 1"));
        }
        if !self.latency_budget_ms.is_finite() || self.latency_budget_ms < 0.0 {
            return Err(invalid(
                "orchestrator.latency_budget_ms",
                "must be a non-negative number",
            ));
        }

        Ok(OrchestratorConfig::new()
            .with_max_execution_secs(self.max_execution_secs)
            .with_selection_policy(self.selection_policy)
            .with_event_capacity(self.event_capacity)
            .with_min_confidence(self.min_confidence)
            .with_latency_budget_ms(self.latency_budget_ms))
    }
}

fn invalid(field: &str, message: &str) -> shortcut_core::Error {
    shortcut_core::Error::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}
