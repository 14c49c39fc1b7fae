//! Incremental checkpoint recording.

use crate::checkpoint::Checkpoint;
use crate::collection::CheckpointCollection;
use sediment_core::{Location, Timestamp, TraceContext, DEFAULT_CACHE_SIZE};
use tracing::debug;

/// Records one checkpoint every `interval` events as the trace is scanned.
///
/// The interval is the trace's cache size; the coupling is deliberate —
/// larger caches trade index memory for seek-scan cost. The indexer is fed
/// from the trace's metadata-update path with the *pre-advance* context of
/// each event read: its rank and location still refer to the event just
/// parsed.
///
/// Re-scans are idempotent: a checkpoint is only appended when it is exactly
/// the next one expected, so replaying an already-indexed prefix (as every
/// checkpoint-resumed seek does) never duplicates entries. After indexing
/// `N` events the collection holds exactly `ceil(N / interval)` checkpoints,
/// at ranks `0, interval, 2*interval, …`.
#[derive(Debug)]
pub struct CheckpointIndexer<L: Location> {
    interval: u64,
    collection: CheckpointCollection<L>,
}

impl<L: Location> CheckpointIndexer<L> {
    /// Create an indexer with the given checkpoint interval.
    ///
    /// A zero interval is coerced to
    /// [`DEFAULT_CACHE_SIZE`](sediment_core::DEFAULT_CACHE_SIZE).
    pub fn new(interval: usize) -> Self {
        Self::with_checkpoints(interval, Vec::new())
    }

    /// Create an indexer over previously recorded checkpoints (e.g. loaded
    /// from a snapshot); incremental indexing continues from their tail.
    pub fn with_checkpoints(interval: usize, checkpoints: Vec<Checkpoint<L>>) -> Self {
        let interval = if interval > 0 { interval } else { DEFAULT_CACHE_SIZE };
        CheckpointIndexer {
            interval: interval as u64,
            collection: CheckpointCollection::from_checkpoints(checkpoints),
        }
    }

    /// The checkpoint interval, in events.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// The underlying collection.
    pub fn collection(&self) -> &CheckpointCollection<L> {
        &self.collection
    }

    /// Observe one event during scanning.
    ///
    /// `context` is the pre-advance context of the event: `rank` and
    /// `location` identify the event itself. Contexts without a valid rank
    /// or location (e.g. after a failed timestamp seek) are ignored.
    pub fn update_index(&self, context: &TraceContext<L>, timestamp: Timestamp) {
        let (Some(rank), Some(location)) = (context.rank(), context.location()) else {
            return;
        };
        if rank % self.interval != 0 {
            return;
        }
        // Only append the checkpoint this rank is expected to produce;
        // anything else is a re-scan of already-indexed events.
        if self.collection.len() as u64 == rank / self.interval {
            debug!(rank, timestamp = %timestamp, "recording checkpoint");
            self.collection
                .append(Checkpoint::new(timestamp, rank, location.clone()));
        }
    }

    /// Context at the nearest checkpoint at or before `rank`.
    pub fn seek_rank(&self, rank: u64) -> TraceContext<L> {
        self.collection.seek_rank(rank)
    }

    /// Context at the nearest checkpoint at or before `timestamp`.
    pub fn seek_timestamp(&self, timestamp: Timestamp) -> TraceContext<L> {
        self.collection.seek_timestamp(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(indexer: &CheckpointIndexer<u64>, n: u64) {
        let mut ctx = TraceContext::new(Some(0u64), Some(0));
        for i in 0..n {
            indexer.update_index(&ctx, Timestamp::from_nanos(i as i64 * 10));
            ctx.advance((i + 1) * 100);
        }
    }

    #[test]
    fn test_checkpoint_density() {
        let indexer = CheckpointIndexer::new(3);
        scan(&indexer, 10);
        // ceil(10 / 3) = 4 checkpoints, at ranks 0, 3, 6, 9.
        assert_eq!(indexer.collection().len(), 4);
        let ranks: Vec<u64> = indexer
            .collection()
            .snapshot()
            .iter()
            .map(|c| c.rank())
            .collect();
        assert_eq!(ranks, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_empty_scan_records_nothing() {
        let indexer: CheckpointIndexer<u64> = CheckpointIndexer::new(3);
        scan(&indexer, 0);
        assert!(indexer.collection().is_empty());
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let indexer = CheckpointIndexer::new(3);
        scan(&indexer, 10);
        scan(&indexer, 10);
        assert_eq!(indexer.collection().len(), 4, "re-scan must not duplicate");
    }

    #[test]
    fn test_unranked_context_is_ignored() {
        let indexer: CheckpointIndexer<u64> = CheckpointIndexer::new(1);
        let ctx = TraceContext::new(Some(0u64), None);
        indexer.update_index(&ctx, Timestamp::from_nanos(5));
        assert!(indexer.collection().is_empty());
    }

    #[test]
    fn test_zero_interval_coerced_to_default() {
        let indexer: CheckpointIndexer<u64> = CheckpointIndexer::new(0);
        assert_eq!(indexer.interval(), DEFAULT_CACHE_SIZE as u64);
    }
}
