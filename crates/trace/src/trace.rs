//! The trace orchestrator: sequential reads, metadata, and seeks.

use crate::parser::EventParser;
use crate::request::EventRequest;
use crate::stats::TraceStatistics;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use sediment_core::{
    CoreError, Event, Result, TimeRange, Timestamp, TraceConfig, TraceContext,
};
use sediment_index::CheckpointIndexer;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Caller-supplied hook invoked for every event read through the trace.
pub type EventHook = Box<dyn Fn(&Event) + Send + Sync>;

/// Running metadata, widened as events are observed.
#[derive(Debug)]
struct TraceMetadata {
    nb_events: u64,
    start_time: Timestamp,
    end_time: Timestamp,
}

/// A trace: an event stream with random access by rank or timestamp.
///
/// The trace orchestrates sequential reads through its [`EventParser`],
/// updates running metadata (event count, time bounds) on every event, and
/// implements the two seek operations over the checkpoint index plus a
/// bounded linear scan.
///
/// # Thread Safety
///
/// One instance-wide lock serializes all read-entry operations (`seek_rank`,
/// `seek_time`, `get_next`) — they read-modify-write the shared metadata.
/// Checkpoint-index searches and appends interleave under their own
/// reader/writer lock, so a background indexing thread and foreground
/// queries coexist on the same instance. Contexts are plain values: clone
/// and dispose are O(1) and never touch the trace.
pub struct Trace<P: EventParser> {
    parser: P,
    config: TraceConfig,
    path: Option<PathBuf>,
    metadata: Mutex<TraceMetadata>,
    indexer: CheckpointIndexer<P::Location>,
    /// Serializes seeks and reads; never held while parked on I/O outside
    /// the parser.
    read_lock: Mutex<()>,
    cancel_indexing: AtomicBool,
    start_location: OnceCell<P::Location>,
    statistics: Option<TraceStatistics>,
    on_event: Option<EventHook>,
}

impl<P: EventParser> Trace<P> {
    /// Create a trace over `parser` with no backing filesystem path.
    pub fn new(parser: P, config: TraceConfig) -> Result<Self> {
        Self::with_options(parser, config, None, false, None)
    }

    /// Create a trace backed by a filesystem path.
    ///
    /// A missing path fails construction fatally: no partial trace object
    /// is returned.
    pub fn open(path: impl Into<PathBuf>, parser: P, config: TraceConfig) -> Result<Self> {
        Self::with_options(parser, config, Some(path.into()), false, None)
    }

    /// Full constructor: optional path validation, optional statistics,
    /// optional per-event hook.
    pub fn with_options(
        parser: P,
        config: TraceConfig,
        path: Option<PathBuf>,
        statistics: bool,
        on_event: Option<EventHook>,
    ) -> Result<Self> {
        if let Some(p) = &path {
            if !p.exists() {
                return Err(CoreError::TraceOpen {
                    path: p.display().to_string(),
                    reason: "no such file or directory".into(),
                });
            }
        }
        Ok(Trace {
            parser,
            indexer: CheckpointIndexer::new(config.cache_size),
            config,
            path,
            metadata: Mutex::new(TraceMetadata {
                nb_events: 0,
                start_time: Timestamp::BIG_CRUNCH,
                end_time: Timestamp::BIG_BANG,
            }),
            read_lock: Mutex::new(()),
            cancel_indexing: AtomicBool::new(false),
            start_location: OnceCell::new(),
            statistics: if statistics {
                Some(TraceStatistics::new())
            } else {
                None
            },
            on_event,
        })
    }

    // ------------------------------------------------------------------
    // Metadata getters
    // ------------------------------------------------------------------

    /// Number of events observed so far (grows during indexing and live
    /// reads; never decreases).
    pub fn nb_events(&self) -> u64 {
        self.metadata.lock().nb_events
    }

    /// Timestamp of the chronologically first observed event
    /// ([`Timestamp::BIG_CRUNCH`] while none has been observed).
    pub fn start_time(&self) -> Timestamp {
        self.metadata.lock().start_time
    }

    /// Timestamp of the chronologically last observed event
    /// ([`Timestamp::BIG_BANG`] while none has been observed).
    pub fn end_time(&self) -> Timestamp {
        self.metadata.lock().end_time
    }

    /// The observed time span.
    pub fn time_range(&self) -> TimeRange {
        let md = self.metadata.lock();
        TimeRange::new(md.start_time, md.end_time)
    }

    /// The checkpoint interval / read cache size.
    pub fn cache_size(&self) -> usize {
        self.config.cache_size
    }

    /// The live-trace polling interval (0 = streaming disabled).
    pub fn streaming_interval_ms(&self) -> u64 {
        self.config.streaming_interval_ms
    }

    /// The backing filesystem path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The checkpoint indexer, for inspection and diagnostics.
    pub fn indexer(&self) -> &CheckpointIndexer<P::Location> {
        &self.indexer
    }

    /// The statistics block, when enabled at construction.
    pub fn statistics(&self) -> Option<&TraceStatistics> {
        self.statistics.as_ref()
    }

    // ------------------------------------------------------------------
    // Seek operations (returning a trace context)
    // ------------------------------------------------------------------

    /// Seek to the event at `rank`.
    ///
    /// Rank 0 seeks the very first event and the returned context's rank is
    /// forced to 0. Otherwise the checkpoint index supplies the nearest
    /// preceding position and the trace scans forward event by event until
    /// the context reaches `rank` or the stream ends (in which case the
    /// context is left at the end of the stream; its next read returns
    /// `None`).
    pub fn seek_rank(&self, rank: u64) -> Result<TraceContext<P::Location>> {
        let _guard = self.read_lock.lock();
        self.seek_rank_locked(rank)
    }

    /// Seek to the first event with timestamp at or after `timestamp`.
    ///
    /// `None` seeks the very first event (rank forced to 0). If no event
    /// reaches the target, the returned context is cleared — location gone,
    /// rank unknown — which is the "not found" value, not an error: callers
    /// check, they don't catch.
    pub fn seek_time(&self, timestamp: Option<Timestamp>) -> Result<TraceContext<P::Location>> {
        let _guard = self.read_lock.lock();

        let Some(target) = timestamp else {
            return self.seek_rank_locked(0);
        };

        // Position at the nearest preceding checkpoint, then probe forward
        // on a clone. The returned context always trails the probe by one
        // event, so when the probe reads the first event at or after the
        // target, `context` is positioned to re-read exactly that event.
        // Only two contexts are ever live, however long the scan.
        let mut context = self.resolve(self.indexer.seek_timestamp(target));
        let mut probe = context.clone();
        let mut event = self.get_next_locked(&mut probe)?;
        while let Some(ev) = &event {
            if ev.timestamp() >= target {
                break;
            }
            context.dispose();
            context = probe.clone();
            event = self.get_next_locked(&mut probe)?;
        }
        probe.dispose();
        if event.is_none() {
            context.dispose();
        }
        Ok(context)
    }

    // ------------------------------------------------------------------
    // Read operations (returning an actual event)
    // ------------------------------------------------------------------

    /// Read the event at `context` and advance the context past it.
    ///
    /// On success the trace metadata is updated, the context adopts the
    /// event's successor location with its rank incremented, and the
    /// per-event hook (if any) fires. At end of stream, returns `Ok(None)`
    /// and leaves the context unchanged. Parser failures propagate.
    pub fn get_next(&self, context: &mut TraceContext<P::Location>) -> Result<Option<Event>> {
        let _guard = self.read_lock.lock();
        self.get_next_locked(context)
    }

    fn seek_rank_locked(&self, rank: u64) -> Result<TraceContext<P::Location>> {
        if rank == 0 {
            return Ok(TraceContext::new(
                Some(self.start_location().clone()),
                Some(0),
            ));
        }

        let mut context = self.resolve(self.indexer.seek_rank(rank));
        while context.rank().map_or(false, |r| r < rank) {
            if self.get_next_locked(&mut context)?.is_none() {
                break;
            }
        }
        Ok(context)
    }

    fn get_next_locked(&self, context: &mut TraceContext<P::Location>) -> Result<Option<Event>> {
        let location = match (context.location(), context.rank()) {
            (Some(l), _) => l.clone(),
            // Stream-begin placeholder on a rank-bearing context.
            (None, Some(_)) => self.start_location().clone(),
            // Disposed/exhausted context: nothing to read.
            (None, None) => return Ok(None),
        };

        let Some((event, next_location)) = self.parser.parse_at(&location)? else {
            return Ok(None);
        };

        // The pre-advance context identifies the event just parsed; that is
        // what the metadata update and the checkpoint indexer must see.
        if context.location().is_none() {
            context.set_location(Some(location));
        }
        self.update_attributes(context, event.timestamp());
        context.advance(next_location);

        if let Some(stats) = &self.statistics {
            stats.record(&event);
        }
        if let Some(hook) = &self.on_event {
            hook(&event);
        }
        Ok(Some(event))
    }

    /// Widen the time bounds, raise the event count, and feed the indexer.
    fn update_attributes(&self, context: &TraceContext<P::Location>, timestamp: Timestamp) {
        {
            let mut md = self.metadata.lock();
            if md.start_time == Timestamp::BIG_CRUNCH || timestamp < md.start_time {
                md.start_time = timestamp;
            }
            if md.end_time == Timestamp::BIG_BANG || timestamp > md.end_time {
                md.end_time = timestamp;
            }
            if let Some(rank) = context.rank() {
                if md.nb_events <= rank {
                    md.nb_events = rank + 1;
                }
            }
        }
        if context.has_valid_rank() {
            self.indexer.update_index(context, timestamp);
        }
    }

    fn start_location(&self) -> &P::Location {
        self.start_location
            .get_or_init(|| self.parser.start_location())
    }

    /// Materialize the stream-begin placeholder handed back by the index.
    fn resolve(&self, mut context: TraceContext<P::Location>) -> TraceContext<P::Location> {
        if context.location().is_none() && context.has_valid_rank() {
            context.set_location(Some(self.start_location().clone()));
        }
        context
    }

    // ------------------------------------------------------------------
    // Indexing
    // ------------------------------------------------------------------

    /// Index the trace synchronously from `start_rank` over `range`,
    /// returning the number of events known when the scan stops.
    ///
    /// Indexing is just reading: every event observed flows through the
    /// normal metadata update, which records a checkpoint each `cache_size`
    /// events. The instance lock is taken per event, so concurrent seeks
    /// interleave rather than starve.
    pub fn build_index(&self, start_rank: u64, range: TimeRange) -> Result<u64> {
        self.cancel_indexing.store(false, Ordering::SeqCst);
        debug!(start_rank, %range, "building index");
        let mut context = self.seek_rank(start_rank)?;
        self.index_from(&mut context, range, false)?;
        Ok(self.nb_events())
    }

    /// Index in a background thread, returning immediately.
    ///
    /// The index is usable in its partial state throughout: queries never
    /// miss already-indexed events, they only linear-scan further for the
    /// rest. With a non-zero `streaming_interval_ms`, the thread re-polls
    /// the parser after exhaustion on that cadence until cancelled.
    pub fn build_index_background(
        self: &Arc<Self>,
        start_rank: u64,
        range: TimeRange,
    ) -> IndexingHandle
    where
        P: 'static,
    {
        self.cancel_indexing.store(false, Ordering::SeqCst);
        let streaming = self.config.streaming_interval_ms > 0;
        let trace = Arc::clone(self);
        let handle = thread::spawn(move || {
            debug!(start_rank, %range, streaming, "background indexing started");
            let mut context = trace.seek_rank(start_rank)?;
            trace.index_from(&mut context, range, streaming)?;
            debug!(nb_events = trace.nb_events(), "background indexing stopped");
            Ok(trace.nb_events())
        });
        IndexingHandle { handle }
    }

    /// Ask a running [`build_index`](Self::build_index) /
    /// [`build_index_background`](Self::build_index_background) to stop.
    ///
    /// Cancellation never corrupts the index: checkpoint appends are atomic
    /// with respect to searchers, so a cancelled index is simply shorter.
    pub fn cancel_indexing(&self) {
        self.cancel_indexing.store(true, Ordering::SeqCst);
    }

    fn index_from(
        &self,
        context: &mut TraceContext<P::Location>,
        range: TimeRange,
        streaming: bool,
    ) -> Result<()> {
        loop {
            if self.cancel_indexing.load(Ordering::SeqCst) {
                debug!("indexing cancelled");
                return Ok(());
            }
            match self.get_next(context)? {
                Some(event) => {
                    if event.timestamp() > range.end() {
                        return Ok(());
                    }
                }
                None => {
                    if streaming && !self.cancel_indexing.load(Ordering::SeqCst) {
                        thread::sleep(Duration::from_millis(self.config.streaming_interval_ms));
                        continue;
                    }
                    return Ok(());
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Bulk-read arming
    // ------------------------------------------------------------------

    /// Resolve a bulk read request to its starting context.
    ///
    /// A request carrying a real start time and index 0 is resolved by
    /// timestamp, and its effective start index is rewritten to the
    /// resolved rank so downstream consumers see a consistent rank-based
    /// cursor. Everything else resolves by rank.
    pub fn arm_request(&self, request: &mut EventRequest) -> Result<TraceContext<P::Location>> {
        if request.start_index == 0 && request.range.start() != Timestamp::BIG_BANG {
            let context = self.seek_time(Some(request.range.start()))?;
            if let Some(rank) = context.rank() {
                request.start_index = rank;
            }
            return Ok(context);
        }
        self.seek_rank(request.start_index)
    }

    // ------------------------------------------------------------------
    // Index snapshot persistence
    // ------------------------------------------------------------------

    /// Persist the current checkpoint index beside the trace.
    pub fn save_index(&self, path: &Path) -> Result<()>
    where
        P::Location: serde::Serialize,
    {
        sediment_index::persist::write_snapshot(
            path,
            self.indexer.interval(),
            &self.indexer.collection().snapshot(),
        )
    }

    /// Restore a previously saved checkpoint index.
    ///
    /// Returns `Ok(false)` without touching the index when the snapshot was
    /// built with a different interval or when this trace already holds
    /// checkpoints. A corrupt snapshot surfaces
    /// [`CoreError::Corruption`]; re-indexing from the trace is always a
    /// safe fallback.
    pub fn restore_index(&self, path: &Path) -> Result<bool>
    where
        P::Location: serde::de::DeserializeOwned,
    {
        let (interval, checkpoints) = sediment_index::persist::read_snapshot(path)?;
        if interval != self.indexer.interval() {
            warn!(
                snapshot_interval = interval,
                trace_interval = self.indexer.interval(),
                "ignoring index snapshot with mismatched interval"
            );
            return Ok(false);
        }
        if !self.indexer.collection().is_empty() {
            return Ok(false);
        }
        self.indexer.collection().restore(checkpoints);
        Ok(true)
    }
}

impl<P: EventParser> std::fmt::Debug for Trace<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let md = self.metadata.lock();
        f.debug_struct("Trace")
            .field("path", &self.path)
            .field("cache_size", &self.config.cache_size)
            .field("nb_events", &md.nb_events)
            .field("start_time", &md.start_time)
            .field("end_time", &md.end_time)
            .finish()
    }
}

/// Handle on a background indexing run.
pub struct IndexingHandle {
    handle: JoinHandle<Result<u64>>,
}

impl IndexingHandle {
    /// Block until indexing stops (completion or cancellation) and return
    /// the number of events known at that point.
    pub fn wait(self) -> Result<u64> {
        self.handle
            .join()
            .map_err(|_| CoreError::Internal("indexing thread panicked".into()))?
    }

    /// Whether the indexing thread has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryParser;
    use sediment_core::TraceConfig;

    fn trace_of(n: usize, cache_size: usize) -> Trace<MemoryParser> {
        Trace::new(
            MemoryParser::generate(n, 1_000, 10),
            TraceConfig::with_cache_size(cache_size),
        )
        .unwrap()
    }

    #[test]
    fn test_get_next_updates_metadata() {
        let trace = trace_of(5, 3);
        let mut ctx = trace.seek_rank(0).unwrap();
        let ev = trace.get_next(&mut ctx).unwrap().unwrap();
        assert_eq!(ev.timestamp(), Timestamp::from_nanos(1_000));
        assert_eq!(trace.nb_events(), 1);
        assert_eq!(trace.start_time(), Timestamp::from_nanos(1_000));
        assert_eq!(trace.end_time(), Timestamp::from_nanos(1_000));
        assert_eq!(ctx.rank(), Some(1));
    }

    #[test]
    fn test_seek_rank_zero_on_empty_trace() {
        let trace = trace_of(0, 3);
        let mut ctx = trace.seek_rank(0).unwrap();
        assert_eq!(ctx.rank(), Some(0));
        assert!(trace.get_next(&mut ctx).unwrap().is_none());
        assert_eq!(trace.nb_events(), 0);
    }

    #[test]
    fn test_seek_time_on_empty_trace_is_cleared() {
        let trace = trace_of(0, 3);
        let ctx = trace.seek_time(Some(Timestamp::from_nanos(0))).unwrap();
        assert!(ctx.location().is_none());
        assert!(!ctx.has_valid_rank());
    }

    #[test]
    fn test_seek_time_finds_first_at_or_after() {
        let trace = trace_of(10, 3);
        // Events at 1000, 1010, ..., 1090. Target 1035 → first >= is 1040,
        // rank 4.
        let mut ctx = trace.seek_time(Some(Timestamp::from_nanos(1_035))).unwrap();
        assert_eq!(ctx.rank(), Some(4));
        let ev = trace.get_next(&mut ctx).unwrap().unwrap();
        assert_eq!(ev.timestamp(), Timestamp::from_nanos(1_040));
    }

    #[test]
    fn test_seek_time_exact_match() {
        let trace = trace_of(10, 3);
        let mut ctx = trace.seek_time(Some(Timestamp::from_nanos(1_050))).unwrap();
        let ev = trace.get_next(&mut ctx).unwrap().unwrap();
        assert_eq!(ev.timestamp(), Timestamp::from_nanos(1_050));
    }

    #[test]
    fn test_seek_time_past_end_clears_context() {
        let trace = trace_of(10, 3);
        let ctx = trace.seek_time(Some(Timestamp::from_nanos(9_999))).unwrap();
        assert!(ctx.location().is_none());
        assert!(!ctx.has_valid_rank());
    }

    #[test]
    fn test_seek_rank_past_end_stops_at_end() {
        let trace = trace_of(4, 2);
        let mut ctx = trace.seek_rank(100).unwrap();
        assert_eq!(ctx.rank(), Some(4), "context stops at end of stream");
        assert!(trace.get_next(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_build_index_records_expected_checkpoints() {
        let trace = trace_of(10, 3);
        trace.build_index(0, TimeRange::ETERNITY).unwrap();
        assert_eq!(trace.nb_events(), 10);
        assert_eq!(trace.indexer().collection().len(), 4);
    }

    #[test]
    fn test_hook_fires_per_event() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let trace = Trace::with_options(
            MemoryParser::generate(6, 0, 5),
            TraceConfig::with_cache_size(2),
            None,
            false,
            Some(Box::new(move |_ev| {
                seen.fetch_add(1, Ordering::SeqCst);
            })),
        )
        .unwrap();
        trace.build_index(0, TimeRange::ETERNITY).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_missing_path_fails_construction() {
        let err = Trace::open(
            "/definitely/not/a/real/path",
            MemoryParser::generate(1, 0, 1),
            TraceConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::TraceOpen { .. }));
    }

    #[test]
    fn test_arm_request_rewrites_start_index() {
        let trace = trace_of(10, 3);
        let mut request = EventRequest::from_time(Timestamp::from_nanos(1_040));
        let ctx = trace.arm_request(&mut request).unwrap();
        assert_eq!(ctx.rank(), Some(4));
        assert_eq!(request.start_index, 4, "request must see a rank cursor");
    }

    #[test]
    fn test_arm_request_by_rank() {
        let trace = trace_of(10, 3);
        let mut request = EventRequest::from_rank(7);
        let ctx = trace.arm_request(&mut request).unwrap();
        assert_eq!(ctx.rank(), Some(7));
    }
}
