//! Port for structured generation logging.
//!
//! Defines the [`GenerationLogger`] trait for recording workflow events
//! (submission, each step's start and outcome, the final status) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures a
//! machine-readable transcript of every generation run (JSONL).

use serde_json::Value;

/// A structured generation event for logging.
pub struct GenerationEvent {
    /// Event type identifier (e.g., "submitted", "step_completed", "finished").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl GenerationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging generation events.
///
/// `log` is synchronous and infallible; implementations drop records they
/// cannot write.
pub trait GenerationLogger: Send + Sync {
    /// Record a generation event.
    fn log(&self, event: GenerationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoGenerationLogger;

impl GenerationLogger for NoGenerationLogger {
    fn log(&self, _event: GenerationEvent) {}
}
