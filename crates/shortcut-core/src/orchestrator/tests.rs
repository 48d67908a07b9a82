//! Orchestrator tests

use super::config::{OrchestrationInput, OrchestratorConfig};
use super::core::Orchestrator;
use super::types::State;
use crate::error::{ErrorKind, ExecutionError};
use crate::event_bus::{OrchestratorEvent, Subscription};
use crate::phases::{
    AnalysisResult, Analyzer, Assessor, ExecutionOutcome, Executor, QualityBadge, ResponseStatus,
};
use crate::registry::{SelectionPolicy, SiteConfig};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct RejectingAnalyzer;

#[async_trait]
impl Analyzer for RejectingAnalyzer {
    async fn analyze(&self, input: &OrchestrationInput) -> AnalysisResult {
        AnalysisResult {
            intent: "unknown".to_string(),
            input: input.input.clone(),
            confidence: 0.1,
            validated: false,
            site_hint: None,
            timestamp: Utc::now(),
        }
    }
}

struct FailingExecutor;

#[async_trait]
impl Executor for FailingExecutor {
    async fn execute(&self, _: &AnalysisResult) -> Result<ExecutionOutcome, ExecutionError> {
        Err(ExecutionError::Backend {
            site: "alpha".to_string(),
            message: "site unreachable".to_string(),
        })
    }
}

/// Sleeps, then reports a fixed latency.
struct SlowExecutor {
    delay: Duration,
    latency_ms: f64,
}

#[async_trait]
impl Executor for SlowExecutor {
    async fn execute(&self, _: &AnalysisResult) -> Result<ExecutionOutcome, ExecutionError> {
        tokio::time::sleep(self.delay).await;
        Ok(ExecutionOutcome {
            selected_site: "slow".to_string(),
            status: ResponseStatus::Success,
            data: json!({}),
            latency_ms: self.latency_ms,
        })
    }
}

#[derive(Default)]
struct CountingAssessor {
    calls: AtomicUsize,
}

impl Assessor for CountingAssessor {
    fn assess(&self, _: &ExecutionOutcome) -> QualityBadge {
        self.calls.fetch_add(1, Ordering::SeqCst);
        QualityBadge::from_score(95.0)
    }
}

/// Blocks for `delay` before scoring.
struct SlowAssessor {
    delay: Duration,
}

impl Assessor for SlowAssessor {
    fn assess(&self, _: &ExecutionOutcome) -> QualityBadge {
        std::thread::sleep(self.delay);
        QualityBadge::from_score(95.0)
    }
}

fn transitions(sub: &mut Subscription) -> Vec<(State, State)> {
    sub.drain()
        .iter()
        .filter_map(OrchestratorEvent::transition)
        .collect()
}

#[test]
fn test_state_successor_cycle() {
    let mut state = State::Idle;
    let mut seen = Vec::new();
    for _ in 0..5 {
        state = state.successor();
        seen.push(state);
    }
    assert_eq!(
        seen,
        vec![
            State::Analyzing,
            State::Executing,
            State::Assessing,
            State::Monitoring,
            State::Idle
        ]
    );
    assert_eq!(State::Assessing.to_string(), "ASSESSING");
}

#[test]
fn test_orchestrator_config() {
    let config = OrchestratorConfig::new()
        .with_max_execution_secs(0)
        .with_selection_policy(SelectionPolicy::RoundRobin)
        .with_event_capacity(8);

    assert_eq!(config.deadline(), None);
    assert_eq!(config.selection_policy, SelectionPolicy::RoundRobin);
    assert_eq!(config.event_capacity, 8);
    assert_eq!(
        OrchestratorConfig::default().deadline(),
        Some(Duration::from_secs(180))
    );
}

#[test]
fn test_orchestration_input() {
    let input = OrchestrationInput::new("ping")
        .with_site("alpha")
        .with_deadline(Duration::from_millis(250));

    assert_eq!(input.text(), "ping");
    assert_eq!(input.site(), Some("alpha"));
    assert_eq!(input.deadline(), Some(Duration::from_millis(250)));
    assert_eq!(OrchestrationInput::new(serde_json::Value::Null).text(), "");
    assert_eq!(OrchestrationInput::new(json!({"a": 1})).text(), "{\"a\":1}");
}

#[tokio::test]
async fn test_successful_run() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default());
    let mut sub = orchestrator.subscribe();

    let result = orchestrator
        .orchestrate(OrchestrationInput::new("ping"))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.execution.selected_site, "default");
    assert_eq!(result.analysis.intent, "orchestrate");
    assert_eq!(result.metrics.quality, result.quality.badge);

    let stats = orchestrator.statistics();
    assert_eq!(stats.total_executions, 1);
    assert_eq!(stats.successful_executions, 1);
    assert_eq!(stats.failed_executions, 0);

    assert_eq!(
        transitions(&mut sub),
        vec![
            (State::Idle, State::Analyzing),
            (State::Analyzing, State::Executing),
            (State::Executing, State::Assessing),
            (State::Assessing, State::Monitoring),
            (State::Monitoring, State::Idle),
        ]
    );
    assert_eq!(orchestrator.active_run_count(), 0);
}

#[tokio::test]
async fn test_validation_failure_short_circuits() {
    let assessor = Arc::new(CountingAssessor::default());
    let orchestrator = Orchestrator::new(OrchestratorConfig::default())
        .with_analyzer(Arc::new(RejectingAnalyzer))
        .with_assessor(assessor.clone());
    let mut sub = orchestrator.subscribe();

    let err = orchestrator
        .orchestrate(OrchestrationInput::new("???"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IntentValidation);
    assert_eq!(err.state, State::Analyzing);
    assert!(err.as_intent_validation().unwrap().reason.contains("unknown"));
    assert_eq!(assessor.calls.load(Ordering::SeqCst), 0);

    let events = sub.drain();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].transition(), Some((State::Idle, State::Analyzing)));
    match &events[1] {
        OrchestratorEvent::Error {
            execution_id, kind, ..
        } => {
            assert_eq!(*execution_id, err.execution_id);
            assert_eq!(*kind, ErrorKind::IntentValidation);
        }
        other => panic!("expected Error, got: {:?}", other),
    }

    let stats = orchestrator.statistics();
    assert_eq!(stats.total_executions, 1);
    assert_eq!(stats.failed_executions, 1);
    assert_eq!(stats.successful_executions, 0);
}

#[tokio::test]
async fn test_execution_failure() {
    let assessor = Arc::new(CountingAssessor::default());
    let orchestrator = Orchestrator::new(OrchestratorConfig::default())
        .with_executor(Arc::new(FailingExecutor))
        .with_assessor(assessor.clone());
    let mut sub = orchestrator.subscribe();

    let err = orchestrator
        .orchestrate(OrchestrationInput::new("ping"))
        .await
        .unwrap_err();

    assert_eq!(err.state, State::Executing);
    assert_eq!(
        err.as_execution(),
        Some(&ExecutionError::Backend {
            site: "alpha".to_string(),
            message: "site unreachable".to_string(),
        })
    );
    assert_eq!(assessor.calls.load(Ordering::SeqCst), 0);

    let events = sub.drain();
    let errors = events.iter().filter(|e| e.is_error()).count();
    assert_eq!(errors, 1);
    assert!(events.last().unwrap().is_error());
    assert_eq!(
        events
            .iter()
            .filter_map(OrchestratorEvent::transition)
            .collect::<Vec<_>>(),
        vec![
            (State::Idle, State::Analyzing),
            (State::Analyzing, State::Executing),
        ]
    );
    assert_eq!(orchestrator.statistics().failed_executions, 1);
}

#[tokio::test]
async fn test_disabled_site_fails_run() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default());
    orchestrator.add_site(SiteConfig::new("alpha").with_enabled(false));

    let err = orchestrator
        .orchestrate(OrchestrationInput::new("ping"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_execution(),
        Some(ExecutionError::InvalidSelection { .. })
    ));
}

#[tokio::test]
async fn test_first_registered_site_selected() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default());
    orchestrator.add_site(SiteConfig::new("alpha"));
    orchestrator.add_site(SiteConfig::new("beta"));

    let result = orchestrator
        .orchestrate(OrchestrationInput::new("ping"))
        .await
        .unwrap();
    assert_eq!(result.execution.selected_site, "alpha");

    let result = orchestrator
        .orchestrate(OrchestrationInput::new("ping").with_site("beta"))
        .await
        .unwrap();
    assert_eq!(result.execution.selected_site, "beta");
}

#[tokio::test]
async fn test_deadline_exceeded_at_boundary() {
    let assessor = Arc::new(CountingAssessor::default());
    let orchestrator = Orchestrator::new(OrchestratorConfig::default())
        .with_executor(Arc::new(SlowExecutor {
            delay: Duration::from_millis(50),
            latency_ms: 50.0,
        }))
        .with_assessor(assessor.clone());

    let err = orchestrator
        .orchestrate(OrchestrationInput::new("ping").with_deadline(Duration::from_millis(5)))
        .await
        .unwrap_err();

    assert_eq!(err.state, State::Executing);
    assert!(matches!(
        err.as_execution(),
        Some(ExecutionError::DeadlineExceeded { limit_ms: 5, .. })
    ));
    assert_eq!(assessor.calls.load(Ordering::SeqCst), 0);
    assert_eq!(orchestrator.statistics().failed_executions, 1);
}

#[tokio::test]
async fn test_cancel_active_run() {
    let orchestrator = Arc::new(Orchestrator::new(OrchestratorConfig::default()).with_executor(
        Arc::new(SlowExecutor {
            delay: Duration::from_millis(100),
            latency_ms: 100.0,
        }),
    ));
    let mut sub = orchestrator.subscribe();

    let runner = Arc::clone(&orchestrator);
    let run = tokio::spawn(async move { runner.orchestrate(OrchestrationInput::new("ping")).await });

    let first = sub.recv().await.unwrap();
    assert!(orchestrator.cancel(first.execution_id()));

    let err = run.await.unwrap().unwrap_err();
    assert_eq!(err.as_execution(), Some(&ExecutionError::Cancelled));
    assert!(!orchestrator.cancel(first.execution_id()));
    assert_eq!(orchestrator.active_run_count(), 0);
}

#[tokio::test]
async fn test_dropped_run_is_counted_as_cancelled() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default()).with_executor(Arc::new(
        SlowExecutor {
            delay: Duration::from_millis(200),
            latency_ms: 200.0,
        },
    ));
    let mut sub = orchestrator.subscribe();

    let timed_out = tokio::time::timeout(
        Duration::from_millis(20),
        orchestrator.orchestrate(OrchestrationInput::new("ping")),
    )
    .await;
    assert!(timed_out.is_err());

    assert_eq!(orchestrator.active_run_count(), 0);
    let stats = orchestrator.statistics();
    assert_eq!(stats.total_executions, 1);
    assert_eq!(stats.failed_executions, 1);
    assert_eq!(stats.successful_executions, 0);

    let events = sub.drain();
    assert_eq!(
        events
            .iter()
            .filter_map(OrchestratorEvent::transition)
            .collect::<Vec<_>>(),
        vec![
            (State::Idle, State::Analyzing),
            (State::Analyzing, State::Executing),
        ]
    );
    let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
    assert_eq!(errors.len(), 1);
    match errors[0] {
        OrchestratorEvent::Error {
            execution_id,
            state,
            kind,
            ..
        } => {
            assert_eq!(*execution_id, events[0].execution_id());
            assert_eq!(*state, State::Executing);
            assert_eq!(*kind, ErrorKind::Execution);
        }
        other => panic!("expected Error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_deadline_exceeded_after_assessing() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default()).with_assessor(Arc::new(
        SlowAssessor {
            delay: Duration::from_millis(50),
        },
    ));
    let mut sub = orchestrator.subscribe();

    let err = orchestrator
        .orchestrate(OrchestrationInput::new("ping").with_deadline(Duration::from_millis(20)))
        .await
        .unwrap_err();

    assert_eq!(err.state, State::Assessing);
    assert!(matches!(
        err.as_execution(),
        Some(ExecutionError::DeadlineExceeded { limit_ms: 20, .. })
    ));

    let events = sub.drain();
    assert_eq!(
        events
            .iter()
            .filter_map(OrchestratorEvent::transition)
            .collect::<Vec<_>>(),
        vec![
            (State::Idle, State::Analyzing),
            (State::Analyzing, State::Executing),
            (State::Executing, State::Assessing),
        ]
    );
    let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        OrchestratorEvent::Error {
            state: State::Assessing,
            ..
        }
    ));
    assert!(events.last().unwrap().is_error());

    let stats = orchestrator.statistics();
    assert_eq!(stats.failed_executions, 1);
    assert_eq!(stats.successful_executions, 0);
    assert_eq!(orchestrator.active_run_count(), 0);
}

#[tokio::test]
async fn test_average_latency_across_runs() {
    let orchestrator = Orchestrator::new(OrchestratorConfig::default()).with_executor(Arc::new(
        SlowExecutor {
            delay: Duration::ZERO,
            latency_ms: 200.0,
        },
    ));

    for _ in 0..3 {
        orchestrator
            .orchestrate(OrchestrationInput::new("ping"))
            .await
            .unwrap();
    }

    let stats = orchestrator.statistics();
    assert_eq!(stats.successful_executions, 3);
    assert!((stats.avg_latency - 200.0).abs() < 1e-9);
}
