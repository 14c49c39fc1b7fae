//! Trace contexts: cloneable cursors into the event stream
//!
//! A [`TraceContext`] pairs an opaque location with the 0-based rank of the
//! next event to read. Seek-by-timestamp probes ahead on clones and disposes
//! the ones it abandons, so both operations must be cheap.
//!
//! Both fields are explicit optionals rather than reserved sentinels:
//! - `rank == None` means rank tracking is not meaningful (e.g. after a
//!   failed timestamp seek);
//! - `location == None` on a rank-bearing context means "beginning of the
//!   stream" (the trace resolves it to the parser's start location);
//!   on a rank-less context it means the stream was exhausted.

use crate::location::Location;

/// An opaque cursor into the event stream.
///
/// The rank is monotonically non-decreasing while advancing from a given
/// context via successive reads.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceContext<L: Location> {
    location: Option<L>,
    rank: Option<u64>,
}

impl<L: Location> TraceContext<L> {
    /// Create a context from explicit parts.
    pub fn new(location: Option<L>, rank: Option<u64>) -> Self {
        TraceContext { location, rank }
    }

    /// A context positioned at the very start of the stream: rank 0, with the
    /// stream-begin location left for the trace to resolve.
    pub fn at_start() -> Self {
        TraceContext {
            location: None,
            rank: Some(0),
        }
    }

    /// The current location, if any.
    pub fn location(&self) -> Option<&L> {
        self.location.as_ref()
    }

    /// The rank of the next event to read, if known.
    pub fn rank(&self) -> Option<u64> {
        self.rank
    }

    /// Whether this context carries a meaningful rank.
    pub fn has_valid_rank(&self) -> bool {
        self.rank.is_some()
    }

    /// Replace the location.
    pub fn set_location(&mut self, location: Option<L>) {
        self.location = location;
    }

    /// Replace the rank.
    pub fn set_rank(&mut self, rank: Option<u64>) {
        self.rank = rank;
    }

    /// Move past one event: adopt its successor location and bump the rank.
    ///
    /// An unknown rank stays unknown; advancing never invents one.
    pub fn advance(&mut self, next_location: L) {
        self.location = Some(next_location);
        if let Some(r) = self.rank {
            self.rank = Some(r + 1);
        }
    }

    /// Release any scoped resources and clear the context.
    ///
    /// After disposal the context reads as exhausted/not-found: no location,
    /// no rank. Disposal is idempotent, and dropping an undisposed context is
    /// equally safe (locations are plain data).
    pub fn dispose(&mut self) {
        self.location = None;
        self.rank = None;
    }
}
