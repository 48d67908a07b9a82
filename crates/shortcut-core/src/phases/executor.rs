//! Site executor
//!
//! Selects a site from the registry and hands the analyzed intent to a
//! [`SiteClient`]. The latency sample is the wall time of the client call.

use super::types::{AnalysisResult, ExecutionOutcome, SiteResponse};
use super::Executor;
use crate::error::ExecutionError;
use crate::registry::{SelectionPolicy, SiteConfig, SiteRegistry};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Transport to a site backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteClient: Send + Sync {
    /// Send one analyzed intent to `site`
    async fn invoke(
        &self,
        site: &SiteConfig,
        analysis: &AnalysisResult,
    ) -> Result<SiteResponse, ExecutionError>;
}

/// Client that answers in-process without contacting a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSiteClient;

#[async_trait]
impl SiteClient for LocalSiteClient {
    async fn invoke(
        &self,
        site: &SiteConfig,
        analysis: &AnalysisResult,
    ) -> Result<SiteResponse, ExecutionError> {
        Ok(SiteResponse::success(json!({
            "message": "Execution completed",
            "site": site.name,
            "intent": analysis.intent,
        })))
    }
}

/// Default [`Executor`]: registry selection plus a client call.
pub struct SiteExecutor {
    registry: Arc<SiteRegistry>,
    client: Arc<dyn SiteClient>,
    policy: SelectionPolicy,
}

impl SiteExecutor {
    /// Create an executor using [`LocalSiteClient`]
    #[must_use]
    pub fn new(registry: Arc<SiteRegistry>, policy: SelectionPolicy) -> Self {
        Self {
            registry,
            client: Arc::new(LocalSiteClient),
            policy,
        }
    }

    /// Use a different site client
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn SiteClient>) -> Self {
        self.client = client;
        self
    }

    /// Selection policy in use
    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }
}

#[async_trait]
impl Executor for SiteExecutor {
    async fn execute(&self, analysis: &AnalysisResult) -> Result<ExecutionOutcome, ExecutionError> {
        let site = self
            .registry
            .select(self.policy, analysis.site_hint.as_deref());

        if !site.enabled {
            return Err(ExecutionError::InvalidSelection {
                site: site.name,
                reason: "site is disabled".to_string(),
            });
        }

        debug!(site = %site.name, intent = %analysis.intent, "Invoking site");
        let started = Instant::now();
        let response = self.client.invoke(&site, analysis).await?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        Ok(ExecutionOutcome {
            selected_site: site.name,
            status: response.status,
            data: response.data,
            latency_ms,
        })
    }
}
