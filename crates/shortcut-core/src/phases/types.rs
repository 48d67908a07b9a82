//! Phase result types
//!
//! Each phase consumes the previous phase's output:
//! - `AnalysisResult` from the analyzer
//! - `ExecutionOutcome` from the executor
//! - `QualityBadge` from the assessor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of the analysis phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Classified intent
    pub intent: String,
    /// Original user input
    pub input: serde_json::Value,
    /// Classification confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Whether the run may proceed to execution
    pub validated: bool,
    /// Preferred site taken from the run context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_hint: Option<String>,
    /// When the analysis finished
    pub timestamp: DateTime<Utc>,
}

/// Status reported by a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The site handled the request fully
    Success,
    /// The site answered with a degraded or incomplete response
    Partial,
}

/// What a site returned for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteResponse {
    /// Response status
    pub status: ResponseStatus,
    /// Response payload
    pub data: serde_json::Value,
}

impl SiteResponse {
    /// A successful response carrying `data`
    #[must_use]
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }

    /// A partial response carrying `data`
    #[must_use]
    pub fn partial(data: serde_json::Value) -> Self {
        Self {
            status: ResponseStatus::Partial,
            data,
        }
    }
}

/// Output of the execution phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Name of the site that handled the run
    pub selected_site: String,
    /// Status reported by the site
    pub status: ResponseStatus,
    /// Site payload
    pub data: serde_json::Value,
    /// Time spent in the site call, in milliseconds
    pub latency_ms: f64,
}

/// Categorical quality label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    /// Score of 90 or more
    Excellent,
    /// Score of 80 or more
    Good,
    /// Anything lower
    Poor,
}

impl Badge {
    /// Minimum score for [`Badge::Excellent`]
    pub const EXCELLENT_THRESHOLD: f64 = 90.0;
    /// Minimum score for [`Badge::Good`]
    pub const GOOD_THRESHOLD: f64 = 80.0;

    /// Derive the badge for a score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if score >= Self::GOOD_THRESHOLD {
            Self::Good
        } else {
            Self::Poor
        }
    }

    /// Star label for display
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "⭐⭐⭐ Excellent",
            Self::Good => "⭐⭐ Good",
            Self::Poor => "⭐ Poor",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the assessment phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBadge {
    /// Score in [0, 100], rounded to one decimal
    pub score: f64,
    /// Label derived from `score`
    pub badge: Badge,
}

impl QualityBadge {
    /// Build a badge from a raw score, clamping it into [0, 100]
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
        let score = (score * 10.0).round() / 10.0;
        Self {
            score,
            badge: Badge::from_score(score),
        }
    }
}
