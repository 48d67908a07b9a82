use super::types::{ExecutionOutcome, QualityBadge, ResponseStatus};
use super::Assessor;

/// Scores outcomes by latency and response status.
///
/// Starts from 100, loses `penalty_per_100ms` points for every 100ms spent
/// over `latency_budget_ms`, and a flat `partial_penalty` when the site
/// answered with a partial response.
#[derive(Debug, Clone, Copy)]
pub struct LatencyAssessor {
    latency_budget_ms: f64,
    penalty_per_100ms: f64,
    partial_penalty: f64,
}

impl Default for LatencyAssessor {
    fn default() -> Self {
        Self {
            latency_budget_ms: 500.0,
            penalty_per_100ms: 2.0,
            partial_penalty: 15.0,
        }
    }
}

impl LatencyAssessor {
    /// Create an assessor with default weights
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latency allowed before penalties apply
    #[must_use]
    pub fn with_latency_budget_ms(mut self, budget_ms: f64) -> Self {
        self.latency_budget_ms = budget_ms.max(0.0);
        self
    }

    /// Set the penalty per 100ms over budget
    #[must_use]
    pub fn with_penalty_per_100ms(mut self, penalty: f64) -> Self {
        self.penalty_per_100ms = penalty.max(0.0);
        self
    }
}

impl Assessor for LatencyAssessor {
    fn assess(&self, outcome: &ExecutionOutcome) -> QualityBadge {
        let overrun = (outcome.latency_ms - self.latency_budget_ms).max(0.0);
        let mut score = 100.0 - overrun / 100.0 * self.penalty_per_100ms;
        if outcome.status == ResponseStatus::Partial {
            score -= self.partial_penalty;
        }
        QualityBadge::from_score(score)
    }
}
