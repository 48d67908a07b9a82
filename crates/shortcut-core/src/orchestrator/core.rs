//! Orchestrator core structure
//!
//! Contains the main `Orchestrator` struct and its builder methods.

use crate::event_bus::{EventBus, Subscription};
use crate::phases::{
    Analyzer, Assessor, Executor, KeywordAnalyzer, LatencyAssessor, SiteClient, SiteExecutor,
};
use crate::registry::{SiteConfig, SiteRegistry};
use crate::stats::{Statistics, StatisticsAggregator};
use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use super::config::OrchestratorConfig;

/// Main orchestrator that drives runs through their phases.
///
/// Holds no per-run state. Concurrent calls to `orchestrate` share only the
/// statistics aggregator, the event bus and the site registry.
pub struct Orchestrator {
    pub(crate) registry: Arc<SiteRegistry>,
    pub(crate) analyzer: Arc<dyn Analyzer>,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) assessor: Arc<dyn Assessor>,
    pub(crate) statistics: Arc<StatisticsAggregator>,
    pub(crate) event_bus: Arc<EventBus>,
    pub(crate) config: OrchestratorConfig,
    /// Active runs with cancellation tokens
    pub(crate) active_executions: Arc<DashMap<Uuid, CancellationToken>>,
}

impl Orchestrator {
    /// Create an orchestrator with the default phase implementations
    #[must_use]
    pub fn new(config: OrchestratorConfig) -> Self {
        let registry = Arc::new(SiteRegistry::new());
        let executor = SiteExecutor::new(Arc::clone(&registry), config.selection_policy);

        Self {
            analyzer: Arc::new(KeywordAnalyzer::new().with_min_confidence(config.min_confidence)),
            executor: Arc::new(executor),
            assessor: Arc::new(
                LatencyAssessor::new().with_latency_budget_ms(config.latency_budget_ms),
            ),
            statistics: Arc::new(StatisticsAggregator::new()),
            event_bus: Arc::new(EventBus::new(config.event_capacity)),
            registry,
            config,
            active_executions: Arc::new(DashMap::new()),
        }
    }

    /// Replace the analysis phase
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the execution phase
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// Keep the default site executor but talk to sites through `client`
    pub fn with_site_client(mut self, client: Arc<dyn SiteClient>) -> Self {
        let executor = SiteExecutor::new(Arc::clone(&self.registry), self.config.selection_policy)
            .with_client(client);
        self.executor = Arc::new(executor);
        self
    }

    /// Replace the assessment phase
    pub fn with_assessor(mut self, assessor: Arc<dyn Assessor>) -> Self {
        self.assessor = assessor;
        self
    }

    /// Use a shared statistics aggregator
    pub fn with_statistics(mut self, statistics: Arc<StatisticsAggregator>) -> Self {
        self.statistics = statistics;
        self
    }

    /// Use a shared event bus
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = bus;
        self
    }

    /// Register a site, overwriting any site with the same name.
    pub fn add_site(&self, site: SiteConfig) {
        info!(site = %site.name, enabled = site.enabled, "Site registered");
        self.registry.add_site(site);
    }

    /// Get the site registry
    #[must_use]
    pub fn registry(&self) -> &Arc<SiteRegistry> {
        &self.registry
    }

    /// Snapshot of the aggregate statistics
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        self.statistics.snapshot()
    }

    /// Get the statistics aggregator
    #[must_use]
    pub fn statistics_aggregator(&self) -> &Arc<StatisticsAggregator> {
        &self.statistics
    }

    /// Subscribe to run events
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.event_bus.subscribe()
    }

    /// Get the event bus
    #[must_use]
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Request cancellation of an active run.
    ///
    /// The run fails at its next phase boundary. Returns false when no run
    /// with this id is active.
    pub fn cancel(&self, execution_id: Uuid) -> bool {
        match self.active_executions.get(&execution_id) {
            Some(token) => {
                token.cancel();
                info!(execution_id = %execution_id, "Run cancellation requested");
                true
            }
            None => false,
        }
    }

    /// Get the number of active runs
    #[must_use]
    pub fn active_run_count(&self) -> usize {
        self.active_executions.len()
    }
}
