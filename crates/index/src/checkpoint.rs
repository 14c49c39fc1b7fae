//! A single recorded trace position.

use sediment_core::{Location, Timestamp};
use serde::{Deserialize, Serialize};

/// A (timestamp, rank, location) triple enabling binary-search-based
/// resumption of sequential parsing.
///
/// Checkpoints are stored in strictly increasing rank order. Timestamps are
/// non-decreasing (the trace is time-ordered) but may repeat; rank breaks
/// such ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<L> {
    timestamp: Timestamp,
    rank: u64,
    location: L,
}

impl<L: Location> Checkpoint<L> {
    /// Record a checkpoint for the event at `rank`.
    pub fn new(timestamp: Timestamp, rank: u64, location: L) -> Self {
        Checkpoint {
            timestamp,
            rank,
            location,
        }
    }

    /// Timestamp of the event at this point.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Ordinal rank of the event at this point.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    /// Location snapshot pointing at the event.
    pub fn location(&self) -> &L {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let cp = Checkpoint::new(Timestamp::from_nanos(500), 10, 4096u64);
        assert_eq!(cp.timestamp(), Timestamp::from_nanos(500));
        assert_eq!(cp.rank(), 10);
        assert_eq!(*cp.location(), 4096);
    }
}
