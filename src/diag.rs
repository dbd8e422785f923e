//! Diagnostic sink implementations.
//!
//! The lock core reports every failure through a [`DiagnosticSink`] and then
//! continues its own error propagation; sinks are observability-only and must
//! never panic. Provides a tracing-backed default and an in-memory buffer for
//! tests and dev.

use std::collections::VecDeque;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::util::clock::now_ms;

/// A single reported failure.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DiagnosticEvent {
    /// Event identifier.
    pub event_id: Uuid,
    /// Handle the failure relates to, when one exists.
    pub handle_id: Option<Uuid>,
    /// Errno-style numeric code, when available.
    pub code: Option<i32>,
    /// Source-location tag (file and line of the reporting site).
    pub location: String,
    /// Operation in progress (create, lock, unlock, destroy).
    pub operation: String,
    /// Additional context.
    pub message: Option<String>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Diagnostic sink abstraction.
///
/// Implementations record events for observability. They have no return value
/// and must not panic; the lock core ignores whatever the sink does
/// internally.
pub trait DiagnosticSink: Send + Sync {
    /// Record a diagnostic event.
    fn record(&self, event: DiagnosticEvent);
}

/// Default sink emitting events through `tracing` at error level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        tracing::error!(
            event_id = %event.event_id,
            handle_id = ?event.handle_id,
            code = ?event.code,
            location = %event.location,
            operation = %event.operation,
            message = ?event.message,
            "lock operation failed"
        );
    }
}

/// In-memory diagnostic sink for testing and dev.
#[derive(Debug)]
pub struct InMemoryDiagnosticSink {
    events: Mutex<VecDeque<DiagnosticEvent>>,
    max_events: usize,
}

impl InMemoryDiagnosticSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl DiagnosticSink for InMemoryDiagnosticSink {
    fn record(&self, event: DiagnosticEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build a diagnostic event from context.
pub fn build_diagnostic(
    handle_id: Option<Uuid>,
    code: Option<i32>,
    location: impl Into<String>,
    operation: impl Into<String>,
    message: Option<String>,
) -> DiagnosticEvent {
    DiagnosticEvent {
        event_id: Uuid::new_v4(),
        handle_id,
        code,
        location: location.into(),
        operation: operation.into(),
        message,
        created_at_ms: now_ms(),
    }
}
