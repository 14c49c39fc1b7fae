//! Vector-backed parser for tests, benches, and synthetic traces.

use crate::parser::EventParser;
use sediment_core::{Event, Result, Timestamp};
use serde_json::json;

/// Ordinal position into an in-memory event buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemoryLocation(pub usize);

/// An in-memory, pre-parsed event stream.
///
/// The simplest possible parser: locations are ordinals, parsing is a
/// vector lookup. [`generate`](Self::generate) builds a deterministic
/// synthetic trace, which is what the test suite and benches run against.
#[derive(Debug)]
pub struct MemoryParser {
    events: Vec<Event>,
}

impl MemoryParser {
    /// Wrap a pre-built, time-ordered event sequence.
    pub fn new(events: Vec<Event>) -> Self {
        debug_assert!(
            events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "events must be time-ordered"
        );
        MemoryParser { events }
    }

    /// Deterministically generate `n` events starting at `start_ns`,
    /// `step_ns` apart, cycling through a fixed set of event types.
    pub fn generate(n: usize, start_ns: i64, step_ns: i64) -> Self {
        const TYPES: [&str; 3] = ["sched_switch", "irq_entry", "syscall"];
        let events = (0..n)
            .map(|i| {
                Event::new(
                    Timestamp::from_nanos(start_ns + i as i64 * step_ns),
                    TYPES[i % TYPES.len()],
                    json!({ "seq": i }),
                )
            })
            .collect();
        MemoryParser { events }
    }

    /// Number of events in the buffer.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventParser for MemoryParser {
    type Location = MemoryLocation;

    fn start_location(&self) -> MemoryLocation {
        MemoryLocation(0)
    }

    fn parse_at(&self, location: &MemoryLocation) -> Result<Option<(Event, MemoryLocation)>> {
        Ok(self
            .events
            .get(location.0)
            .map(|event| (event.clone(), MemoryLocation(location.0 + 1))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_ordered_and_deterministic() {
        let a = MemoryParser::generate(100, 0, 7);
        let b = MemoryParser::generate(100, 0, 7);
        assert_eq!(a.len(), 100);
        for i in 0..100 {
            let (ea, _) = a.parse_at(&MemoryLocation(i)).unwrap().unwrap();
            let (eb, _) = b.parse_at(&MemoryLocation(i)).unwrap().unwrap();
            assert_eq!(ea, eb);
            assert_eq!(ea.timestamp(), Timestamp::from_nanos(i as i64 * 7));
        }
    }

    #[test]
    fn test_parse_past_end_is_none() {
        let parser = MemoryParser::generate(3, 0, 1);
        assert!(parser.parse_at(&MemoryLocation(3)).unwrap().is_none());
    }

    #[test]
    fn test_parse_is_pure() {
        let parser = MemoryParser::generate(3, 0, 1);
        let loc = MemoryLocation(1);
        let first = parser.parse_at(&loc).unwrap().unwrap();
        let second = parser.parse_at(&loc).unwrap().unwrap();
        assert_eq!(first, second, "same location, same answer");
        assert_eq!(loc, MemoryLocation(1), "location is untouched");
    }
}
