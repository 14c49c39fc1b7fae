//! Event type for the trace stream
//!
//! An [`Event`] is one parsed record of the stream. The core treats the
//! payload as opaque; only the timestamp participates in the indexing and
//! seek algorithms.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single event of the trace.
///
/// Events are produced by the format-specific parser and are immutable once
/// parsed. Their ordinal position (rank) is carried by the
/// [`TraceContext`](crate::TraceContext) that read them, not by the event
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// When the event occurred, in trace time.
    pub timestamp: Timestamp,
    /// Format-defined event category (e.g. "sched_switch", "irq_entry").
    pub event_type: String,
    /// Arbitrary parsed content; opaque to the core.
    pub payload: Value,
}

impl Event {
    /// Create an event.
    pub fn new(timestamp: Timestamp, event_type: impl Into<String>, payload: Value) -> Self {
        Event {
            timestamp,
            event_type: event_type.into(),
            payload,
        }
    }

    /// The event's timestamp.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
