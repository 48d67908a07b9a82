//! Statistics aggregation across runs
//!
//! One [`StatisticsAggregator`] is shared by every run of an engine. Each run
//! updates it exactly once, on either the success or the failure path. All
//! counters live behind one mutex so a snapshot always satisfies
//! `total_executions == successful_executions + failed_executions`.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Point-in-time view of the aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Runs finished, successful or not
    pub total_executions: u64,
    /// Runs that reached IDLE again
    pub successful_executions: u64,
    /// Runs that failed
    pub failed_executions: u64,
    /// Mean execution latency over successful runs, in milliseconds
    pub avg_latency: f64,
}

impl Statistics {
    /// Share of runs that succeeded (0.0 when nothing ran yet)
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_executions == 0 {
            0.0
        } else {
            self.successful_executions as f64 / self.total_executions as f64
        }
    }
}

/// Thread-safe running statistics.
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    inner: Mutex<Statistics>,
}

impl StatisticsAggregator {
    /// Create an aggregator with all counters at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful run with its latency sample (milliseconds).
    ///
    /// The average is updated incrementally:
    /// `avg' = avg + (sample - avg) / successful'`.
    pub fn record_success(&self, latency_ms: f64) {
        let sample = if latency_ms.is_finite() {
            latency_ms.max(0.0)
        } else {
            0.0
        };

        let mut stats = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        stats.total_executions += 1;
        stats.successful_executions += 1;
        stats.avg_latency += (sample - stats.avg_latency) / stats.successful_executions as f64;
    }

    /// Record a failed run.
    pub fn record_failure(&self) {
        let mut stats = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        stats.total_executions += 1;
        stats.failed_executions += 1;
    }

    /// Take a consistent snapshot of the counters.
    #[must_use]
    pub fn snapshot(&self) -> Statistics {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = Statistics::default();
    }
}
