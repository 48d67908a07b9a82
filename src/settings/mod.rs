//! Application settings
//!
//! - `types`: `AppConfig` and its sections
//! - `loader`: layered loading from defaults, files and environment

mod loader;
mod types;

pub use loader::load_config;
pub use types::{AppConfig, OrchestratorAppConfig};
