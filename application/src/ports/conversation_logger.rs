//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording session events
//! (turns, declined turns, survey answers) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the run in a
//! machine-readable form (JSONL).

use serde_json::Value;

/// A structured session event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "turn", "survey_answer", "session_end").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging session events to a structured log.
///
/// `log` is synchronous and infallible; a failing sink must never stop a
/// session.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
