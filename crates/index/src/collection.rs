//! Ordered, append-only checkpoint storage with binary search.

use crate::checkpoint::Checkpoint;
use parking_lot::RwLock;
use sediment_core::{Location, Timestamp, TraceContext};
use tracing::trace;

/// The ordered collection of checkpoints.
///
/// Appends are pure tail-inserts under the write lock; searches take the
/// read lock. Existing entries are never mutated or reordered, so a search
/// racing an append either sees the new tail entry or not — both answers are
/// correct, the latter just costs more linear scanning downstream. This is
/// what lets one thread build the index while others query it.
#[derive(Debug)]
pub struct CheckpointCollection<L: Location> {
    checkpoints: RwLock<Vec<Checkpoint<L>>>,
}

impl<L: Location> CheckpointCollection<L> {
    /// Create an empty collection.
    pub fn new() -> Self {
        CheckpointCollection {
            checkpoints: RwLock::new(Vec::new()),
        }
    }

    /// Rebuild a collection from previously recorded checkpoints (e.g. a
    /// persisted snapshot). The caller guarantees ordering.
    pub fn from_checkpoints(checkpoints: Vec<Checkpoint<L>>) -> Self {
        debug_assert!(
            checkpoints.windows(2).all(|w| w[0].rank() < w[1].rank()),
            "checkpoints must be strictly increasing in rank"
        );
        CheckpointCollection {
            checkpoints: RwLock::new(checkpoints),
        }
    }

    /// Append a checkpoint at the tail.
    ///
    /// The caller guarantees ordering (strictly increasing rank,
    /// non-decreasing timestamp); the collection does not re-sort.
    pub fn append(&self, checkpoint: Checkpoint<L>) {
        let mut checkpoints = self.checkpoints.write();
        debug_assert!(
            checkpoints.last().map_or(true, |last| last.rank() < checkpoint.rank()),
            "checkpoint rank must exceed the current tail"
        );
        trace!(
            rank = checkpoint.rank(),
            timestamp = %checkpoint.timestamp(),
            "appending checkpoint"
        );
        checkpoints.push(checkpoint);
    }

    /// Number of checkpoints recorded so far.
    pub fn len(&self) -> usize {
        self.checkpoints.read().len()
    }

    /// Whether no checkpoint has been recorded.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.read().is_empty()
    }

    /// Rank of the most recent checkpoint, if any.
    pub fn last_rank(&self) -> Option<u64> {
        self.checkpoints.read().last().map(Checkpoint::rank)
    }

    /// Context at the nearest checkpoint at or before `rank`.
    ///
    /// Falls back to the start-of-trace context when the index is empty or
    /// `rank` precedes the first checkpoint.
    pub fn seek_rank(&self, rank: u64) -> TraceContext<L> {
        let checkpoints = self.checkpoints.read();
        let idx = checkpoints.partition_point(|c| c.rank() <= rank);
        Self::context_at(&checkpoints, idx)
    }

    /// Context at the last checkpoint strictly before `timestamp`.
    ///
    /// Strictly, not at-or-before: a checkpoint whose timestamp equals the
    /// target may have earlier events sharing that timestamp before it, and
    /// resuming there would skip them. Starting one checkpoint back
    /// guarantees the forward scan meets the *first* event at or after the
    /// target. Same start-of-trace fallback as [`seek_rank`](Self::seek_rank)
    /// when no checkpoint strictly precedes the target.
    pub fn seek_timestamp(&self, timestamp: Timestamp) -> TraceContext<L> {
        let checkpoints = self.checkpoints.read();
        let idx = checkpoints.partition_point(|c| c.timestamp() < timestamp);
        Self::context_at(&checkpoints, idx)
    }

    /// Clone out the current contents, for persistence.
    pub fn snapshot(&self) -> Vec<Checkpoint<L>> {
        self.checkpoints.read().clone()
    }

    /// Replace the contents wholesale (snapshot restoration). The caller
    /// guarantees ordering, as with [`append`](Self::append).
    pub fn restore(&self, checkpoints: Vec<Checkpoint<L>>) {
        debug_assert!(
            checkpoints.windows(2).all(|w| w[0].rank() < w[1].rank()),
            "checkpoints must be strictly increasing in rank"
        );
        *self.checkpoints.write() = checkpoints;
    }

    fn context_at(checkpoints: &[Checkpoint<L>], partition: usize) -> TraceContext<L> {
        if partition == 0 {
            return TraceContext::at_start();
        }
        let cp = &checkpoints[partition - 1];
        TraceContext::new(Some(cp.location().clone()), Some(cp.rank()))
    }
}

impl<L: Location> Default for CheckpointCollection<L> {
    fn default() -> Self {
        Self::new()
    }
}
