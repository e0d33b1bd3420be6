//! Port for structured allocation audit logging.
//!
//! Defines the [`AllocationLogger`] trait for recording what reconciliations
//! and juror actions did to a round, in a machine-readable form.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures an audit trail
//! (e.g. one JSONL line per applied changeset).

use montage_domain::RoundId;
use serde_json::Value;

/// Something that happened to one round
pub struct AllocationEvent {
    /// Event type identifier (e.g., "allocation_applied", "rating_submitted").
    pub event_type: &'static str,
    pub round: RoundId,
    /// Event-specific fields; an object's keys sit next to `type` and `round`.
    pub details: Value,
}

impl AllocationEvent {
    pub fn new(event_type: &'static str, round: RoundId, details: Value) -> Self {
        Self {
            event_type,
            round,
            details,
        }
    }
}

/// Port for logging allocation events.
///
/// The `log` method is synchronous and infallible: audit logging must never
/// abort a reconciliation that has already been applied.
pub trait AllocationLogger: Send + Sync {
    /// Record an allocation event.
    fn log(&self, event: AllocationEvent);
}

/// No-op implementation for tests and when audit logging is disabled.
pub struct NoAllocationLogger;

impl AllocationLogger for NoAllocationLogger {
    fn log(&self, _event: AllocationEvent) {}
}
