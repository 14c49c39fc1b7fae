//! Bulk read requests.

use sediment_core::{TimeRange, Timestamp};

/// A bulk read request: where to start and how much to read.
///
/// A request starts either at an ordinal rank or (exclusively) at the first
/// event inside its time range — the two are reconciled by
/// [`Trace::arm_request`](crate::Trace::arm_request), which rewrites a
/// time-based request's `start_index` to the resolved rank so every
/// downstream consumer sees a rank-based cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    /// Time range of interest; a `BIG_BANG` start means "not time-based".
    pub range: TimeRange,
    /// Rank of the first event to deliver.
    pub start_index: u64,
    /// Number of events requested; `None` = all remaining.
    pub nb_requested: Option<u64>,
}

impl EventRequest {
    /// Request every event of the trace.
    pub fn all() -> Self {
        EventRequest {
            range: TimeRange::ETERNITY,
            start_index: 0,
            nb_requested: None,
        }
    }

    /// Request events starting at `rank`.
    pub fn from_rank(rank: u64) -> Self {
        EventRequest {
            range: TimeRange::ETERNITY,
            start_index: rank,
            nb_requested: None,
        }
    }

    /// Request events starting at the first event at or after `start`.
    pub fn from_time(start: Timestamp) -> Self {
        EventRequest {
            range: TimeRange::new(start, Timestamp::BIG_CRUNCH),
            start_index: 0,
            nb_requested: None,
        }
    }

    /// Cap the number of events delivered.
    pub fn with_count(mut self, count: u64) -> Self {
        self.nb_requested = Some(count);
        self
    }
}
