//! `shortcut run`

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use shortcut_core::{
    format_error_for_cli, OrchestrationInput, Orchestrator, OrchestratorEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::RunArgs;

/// Orchestrate the input `repeat` times and print results plus statistics
pub async fn run(args: RunArgs) -> Result<()> {
    let config = crate::settings::load_config()?;
    let engine_config = config
        .orchestrator
        .to_orchestrator_config()
        .map_err(|e| anyhow::anyhow!(format_error_for_cli(&e)))?;

    let orchestrator = Arc::new(Orchestrator::new(engine_config));
    for site in config.sites {
        orchestrator.add_site(site);
    }

    let listener = orchestrator.event_bus().listen(log_event);

    let input = build_input(&args);
    let runs = args.repeat.max(1);
    let results: Vec<_> = stream::iter(0..runs)
        .map(|_| {
            let orchestrator = Arc::clone(&orchestrator);
            let input = input.clone();
            async move { orchestrator.orchestrate(input).await }
        })
        .buffer_unordered(args.concurrency.max(1))
        .collect()
        .await;

    let mut failures = 0usize;
    for result in &results {
        match result {
            Ok(result) => {
                let rendered =
                    serde_json::to_string_pretty(result).context("Failed to render result")?;
                println!("{}", rendered);
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}", format_error_for_cli(e));
            }
        }
    }

    let stats = orchestrator.statistics();
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("Failed to render statistics")?
    );

    // closes the bus so the listener drains and exits
    drop(orchestrator);
    listener.join().await;

    if failures > 0 {
        bail!("{} of {} runs failed", failures, runs);
    }
    Ok(())
}

fn build_input(args: &RunArgs) -> OrchestrationInput {
    let mut input = OrchestrationInput::new(args.input.as_str());
    for (key, value) in &args.context {
        input = input.with_context_value(key.as_str(), value.clone());
    }
    if let Some(site) = &args.site {
        input = input.with_site(site.as_str());
    }
    if let Some(ms) = args.deadline_ms {
        input = input.with_deadline(Duration::from_millis(ms));
    }
    input
}

fn log_event(event: OrchestratorEvent) {
    match event {
        OrchestratorEvent::StateChanged {
            execution_id,
            from,
            to,
        } => info!(execution_id = %execution_id, %from, %to, "state_changed"),
        OrchestratorEvent::Error {
            execution_id,
            state,
            kind,
            cause,
        } => warn!(execution_id = %execution_id, %state, ?kind, %cause, "error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_input() {
        let args = RunArgs {
            input: "find docs".to_string(),
            context: vec![("user".to_string(), serde_json::json!("alice"))],
            site: Some("alpha".to_string()),
            deadline_ms: Some(250),
            repeat: 1,
            concurrency: 1,
        };
        let input = build_input(&args);

        assert_eq!(input.text(), "find docs");
        assert_eq!(input.site(), Some("alpha"));
        assert_eq!(input.deadline(), Some(Duration::from_millis(250)));
        assert_eq!(input.context["user"], "alice");
    }
}
