//! CLI module for Shortcut
//!
//! Provides commands:
//! - `run`: Orchestrate one input (optionally repeated and concurrent)
//! - `sites`: List configured sites
//! - `config`: Print the effective configuration

use clap::{Args, Parser, Subcommand};

pub mod run;
pub mod sites;

/// Shortcut orchestration CLI
#[derive(Parser, Debug)]
#[command(name = "shortcut")]
#[command(about = "Single-request orchestration engine")]
#[command(version)]
pub struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Orchestrate an input and print the result
    Run(RunArgs),
    /// List configured sites
    Sites,
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// User input
    pub input: String,

    /// Context entry as KEY=VALUE (VALUE is parsed as JSON when possible)
    #[arg(long = "context", short = 'c', value_parser = parse_key_val)]
    pub context: Vec<(String, serde_json::Value)>,

    /// Preferred site
    #[arg(long)]
    pub site: Option<String>,

    /// Per-run deadline in milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Number of runs
    #[arg(long, default_value_t = 1)]
    pub repeat: usize,

    /// Runs in flight at once
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
}

fn parse_key_val(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => run::run(args).await,
        Some(Commands::Sites) => sites::run(),
        Some(Commands::Config) => {
            let config = crate::settings::load_config()?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("deadline_ms=500").unwrap(),
            ("deadline_ms".to_string(), serde_json::json!(500))
        );
        assert_eq!(
            parse_key_val("user=alice").unwrap(),
            ("user".to_string(), serde_json::json!("alice"))
        );
        assert!(parse_key_val("novalue").is_err());
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::parse_from([
            "shortcut", "run", "ping", "--site", "alpha", "-c", "k=v", "--repeat", "3",
        ]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.input, "ping");
                assert_eq!(args.site.as_deref(), Some("alpha"));
                assert_eq!(args.context.len(), 1);
                assert_eq!(args.repeat, 3);
                assert_eq!(args.concurrency, 1);
            }
            other => panic!("expected run, got: {:?}", other),
        }
    }
}
