//! EventBus - broadcast-based event system for run lifecycle events.
//!
//! Publishes state transitions and run failures so that loggers, dashboards
//! and other listeners can follow runs without polling the engine.

/// Core event bus implementation (broadcast channel).
pub mod bus;
/// Event type definitions for the run lifecycle.
pub mod types;

pub use bus::{EventBus, ListenerHandle, Subscription};
pub use types::OrchestratorEvent;
