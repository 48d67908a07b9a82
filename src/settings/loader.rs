//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::types::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("SHORTCUT_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        // SHORTCUT_ORCHESTRATOR__SELECTION_POLICY=round_robin
        .add_source(
            Environment::with_prefix("SHORTCUT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortcut_core::SelectionPolicy;

    #[test]
    fn test_embedded_defaults_parse() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.orchestrator.max_execution_secs, 180);
        assert_eq!(
            config.orchestrator.selection_policy,
            SelectionPolicy::FirstRegistered
        );
        assert!(config.sites.is_empty());
        assert!(config.orchestrator.to_orchestrator_config().is_ok());
    }

    #[test]
    fn test_sites_from_toml() {
        let toml = r#"
            [orchestrator]
            selection_policy = "round_robin"

            [[sites]]
            name = "primary"
            region = "eu-west"

            [[sites]]
            name = "backup"
            enabled = false
        "#;
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(
            config.orchestrator.selection_policy,
            SelectionPolicy::RoundRobin
        );
        assert_eq!(config.sites.len(), 2);
        assert_eq!(config.sites[0].params["region"], "eu-west");
        assert!(!config.sites[1].enabled);
    }
}
