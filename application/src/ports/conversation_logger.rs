//! Port for structured debate transcripts.
//!
//! Defines the [`ConversationLogger`] trait for recording debate events
//! (round dispatch, participant answers, scores, status changes, enrichments)
//! to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the full debate
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured debate event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "round_started", "participant_response").
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

/// Port for logging debate events.
///
/// `log` is synchronous and non-fallible; a failed write never interrupts a debate.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when transcript logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
