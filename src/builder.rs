//! Trace construction.

use crate::error::Result;
use sediment_core::{Event, TraceConfig, DEFAULT_CACHE_SIZE};
use sediment_trace::{EventHook, EventParser, JsonlParser, Trace};
use std::path::PathBuf;

/// Builder for [`Trace`] instances.
///
/// # Example
///
/// ```
/// use sediment::prelude::*;
///
/// # fn main() -> sediment::Result<()> {
/// let trace = TraceBuilder::new()
///     .cache_size(5_000)
///     .with_statistics()
///     .build(MemoryParser::generate(100, 0, 10))?;
/// # Ok(())
/// # }
/// ```
pub struct TraceBuilder {
    cache_size: usize,
    streaming_interval_ms: u64,
    path: Option<PathBuf>,
    statistics: bool,
    on_event: Option<EventHook>,
}

impl TraceBuilder {
    /// Start from defaults: default cache size, streaming off, no
    /// statistics, no hook.
    pub fn new() -> Self {
        TraceBuilder {
            cache_size: DEFAULT_CACHE_SIZE,
            streaming_interval_ms: 0,
            path: None,
            statistics: false,
            on_event: None,
        }
    }

    /// Checkpoint interval / read cache size. Zero falls back to the
    /// default.
    pub fn cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Polling interval for live traces, in milliseconds (0 = off).
    pub fn streaming_interval_ms(mut self, interval_ms: u64) -> Self {
        self.streaming_interval_ms = interval_ms;
        self
    }

    /// Filesystem path backing the trace. Validated fatally at build time:
    /// a missing path yields no trace object at all.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Enable the statistics block (total and per-type event counts).
    pub fn with_statistics(mut self) -> Self {
        self.statistics = true;
        self
    }

    /// Install a hook invoked for every event read through the trace.
    pub fn on_event(mut self, hook: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(hook));
        self
    }

    /// Build a trace over the given parser.
    pub fn build<P: EventParser>(self, parser: P) -> Result<Trace<P>> {
        let config = TraceConfig::new(self.cache_size, self.streaming_interval_ms);
        Ok(Trace::with_options(
            parser,
            config,
            self.path,
            self.statistics,
            self.on_event,
        )?)
    }

    /// Convenience: open a newline-delimited JSON trace file.
    pub fn open_jsonl(self, path: impl Into<PathBuf>) -> Result<Trace<JsonlParser>> {
        let path = path.into();
        let parser = JsonlParser::open(&path)?;
        self.path(path).build(parser)
    }
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
