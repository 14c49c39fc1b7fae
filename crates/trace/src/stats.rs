//! Optional per-trace statistics.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use sediment_core::Event;

/// Event counts, total and per event type.
///
/// Statistics are an explicit optional on the trace — `None` unless enabled
/// at construction — so callers must handle the "no statistics" case rather
/// than read zeros from a half-alive block. When enabled, every event read
/// through the trace is recorded, including events re-read while seeking.
#[derive(Debug, Default)]
pub struct TraceStatistics {
    inner: Mutex<StatsInner>,
}

#[derive(Debug, Default)]
struct StatsInner {
    total: u64,
    per_type: FxHashMap<String, u64>,
}

impl TraceStatistics {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed event.
    pub fn record(&self, event: &Event) {
        let mut inner = self.inner.lock();
        inner.total += 1;
        *inner.per_type.entry(event.event_type.clone()).or_insert(0) += 1;
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.inner.lock().total
    }

    /// Observations of one event type.
    pub fn count_for(&self, event_type: &str) -> u64 {
        self.inner
            .lock()
            .per_type
            .get(event_type)
            .copied()
            .unwrap_or(0)
    }

    /// The event types seen so far, unordered.
    pub fn event_types(&self) -> Vec<String> {
        self.inner.lock().per_type.keys().cloned().collect()
    }
}
