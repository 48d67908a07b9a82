//! Shortcut - single-request orchestration engine
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shortcut=info,shortcut_core=info".into()),
        )
        .with(
            cli.json_logs
                .then(|| fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with((!cli.json_logs).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    cli::run(cli).await
}
