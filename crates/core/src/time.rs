//! Trace time: nanosecond timestamps and time ranges
//!
//! Trace time is its own domain, not wall-clock time. A [`Timestamp`] is a
//! signed nanosecond count whose origin is defined by the trace format; all
//! the core needs is a strict total order. The sentinels [`Timestamp::BIG_BANG`]
//! ("infinitely early") and [`Timestamp::BIG_CRUNCH`] ("infinitely late")
//! initialize trace bounds so the first observed event always tightens them.

use serde::{Deserialize, Serialize};

/// A point in trace time, in nanoseconds.
///
/// Ordering is the strict total order on the raw nanosecond value. Seek
/// operations advance while an event's timestamp is strictly less than the
/// target and stop at the first event at or after it; events sharing a
/// timestamp are ordered by rank, because scanning is rank-ordered.
///
/// # Examples
///
/// ```
/// use sediment_core::Timestamp;
///
/// let a = Timestamp::from_nanos(1_000);
/// let b = Timestamp::from_nanos(2_000);
/// assert!(a < b);
/// assert!(Timestamp::BIG_BANG < a);
/// assert!(b < Timestamp::BIG_CRUNCH);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The earliest representable instant ("infinitely early").
    ///
    /// Used as the initial end-time of an empty trace and as the open lower
    /// bound of [`TimeRange::ETERNITY`]. No real event carries this value.
    pub const BIG_BANG: Timestamp = Timestamp(i64::MIN);

    /// The latest representable instant ("infinitely late").
    ///
    /// Used as the initial start-time of an empty trace and as the open upper
    /// bound of [`TimeRange::ETERNITY`]. No real event carries this value.
    pub const BIG_CRUNCH: Timestamp = Timestamp(i64::MAX);

    /// Create a timestamp from a raw nanosecond count.
    pub const fn from_nanos(nanos: i64) -> Self {
        Timestamp(nanos)
    }

    /// Raw nanosecond count.
    pub const fn as_nanos(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Timestamp::BIG_BANG => write!(f, "-inf"),
            Timestamp::BIG_CRUNCH => write!(f, "+inf"),
            Timestamp(ns) => write!(f, "{}ns", ns),
        }
    }
}

/// A closed interval of trace time.
///
/// `start` and `end` are inclusive. The degenerate case `start == end` is a
/// single instant; construction does not reject `start > end` (such a range
/// simply contains nothing), matching the permissive bounds of the seek
/// protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    /// The full span of trace time, containing every real timestamp.
    pub const ETERNITY: TimeRange = TimeRange {
        start: Timestamp::BIG_BANG,
        end: Timestamp::BIG_CRUNCH,
    };

    /// Create a range from inclusive bounds.
    pub const fn new(start: Timestamp, end: Timestamp) -> Self {
        TimeRange { start, end }
    }

    /// Inclusive lower bound.
    pub const fn start(&self) -> Timestamp {
        self.start
    }

    /// Inclusive upper bound.
    pub const fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether `ts` falls within this range (inclusive on both ends).
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// Whether this range and `other` share at least one instant.
    pub fn intersects(&self, other: &TimeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
