//! Site Registry — named execution targets.
//!
//! Sites are kept in insertion order. Re-registering a name replaces the
//! configuration but keeps the original position, so selection stays
//! deterministic for a given sequence of registrations.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Name reported when no site is registered.
pub const DEFAULT_SITE: &str = "default";

/// Configuration of a registered site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Unique site name
    pub name: String,
    /// Disabled sites are never invoked
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Arbitrary execution parameters
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl SiteConfig {
    /// Create an enabled site with no parameters
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            params: serde_json::Map::new(),
        }
    }

    /// Add an execution parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Set whether the site accepts work
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The fallback site used when the registry is empty
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(DEFAULT_SITE)
    }
}

/// How [`SiteRegistry::select`] chooses among registered sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Always the earliest registered site
    #[default]
    FirstRegistered,
    /// Rotate through sites in registration order, one step per selection
    RoundRobin,
}

impl std::str::FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "first_registered" | "first" => Ok(Self::FirstRegistered),
            "round_robin" => Ok(Self::RoundRobin),
            other => Err(format!("unknown selection policy: {}", other)),
        }
    }
}

/// Thread-safe registry of sites.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: RwLock<Vec<SiteConfig>>,
    cursor: AtomicUsize,
}

impl SiteRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a site, or overwrite the one with the same name.
    pub fn add_site(&self, site: SiteConfig) {
        let mut sites = self.sites.write().unwrap_or_else(|e| e.into_inner());
        match sites.iter_mut().find(|s| s.name == site.name) {
            Some(existing) => *existing = site,
            None => sites.push(site),
        }
    }

    /// Remove a site by name, returning its configuration.
    pub fn remove(&self, name: &str) -> Option<SiteConfig> {
        let mut sites = self.sites.write().unwrap_or_else(|e| e.into_inner());
        let index = sites.iter().position(|s| s.name == name)?;
        Some(sites.remove(index))
    }

    /// Look up a site by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SiteConfig> {
        let sites = self.sites.read().unwrap_or_else(|e| e.into_inner());
        sites.iter().find(|s| s.name == name).cloned()
    }

    /// Registered site names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let sites = self.sites.read().unwrap_or_else(|e| e.into_inner());
        sites.iter().map(|s| s.name.clone()).collect()
    }

    /// Snapshot of all registered sites, in registration order.
    #[must_use]
    pub fn sites(&self) -> Vec<SiteConfig> {
        self.sites.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of registered sites
    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no site is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Choose a site for a run.
    ///
    /// A `hint` naming a registered site always wins. Otherwise the policy
    /// decides. An empty registry yields [`SiteConfig::fallback`].
    #[must_use]
    pub fn select(&self, policy: SelectionPolicy, hint: Option<&str>) -> SiteConfig {
        let sites = self.sites.read().unwrap_or_else(|e| e.into_inner());

        if let Some(site) = hint.and_then(|name| sites.iter().find(|s| s.name == name)) {
            return site.clone();
        }

        if sites.is_empty() {
            return SiteConfig::fallback();
        }

        let index = match policy {
            SelectionPolicy::FirstRegistered => 0,
            SelectionPolicy::RoundRobin => self.cursor.fetch_add(1, Ordering::Relaxed) % sites.len(),
        };
        sites[index].clone()
    }
}
