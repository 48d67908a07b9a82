//! `shortcut sites`

use anyhow::Result;

/// Print configured sites in registration order
pub fn run() -> Result<()> {
    let config = crate::settings::load_config()?;
    if config.sites.is_empty() {
        println!("No sites configured; runs use the \"{}\" site.", shortcut_core::DEFAULT_SITE);
        return Ok(());
    }

    for (index, site) in config.sites.iter().enumerate() {
        let status = if site.enabled { "enabled" } else { "disabled" };
        let params = serde_json::Value::Object(site.params.clone());
        println!("{:>2}. {} [{}] {}", index + 1, site.name, status, params);
    }
    Ok(())
}
