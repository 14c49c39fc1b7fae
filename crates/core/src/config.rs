//! Trace configuration
//!
//! The two knobs the core consumes: the checkpoint interval (`cache_size`)
//! and the live-trace polling interval. Both are fixed at construction.

use serde::{Deserialize, Serialize};

/// Default checkpoint interval, in events.
///
/// Applied whenever a non-positive cache size is supplied. Larger values
/// trade index memory for longer linear scans between checkpoints.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Construction-time configuration for a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Checkpoint interval: one checkpoint is recorded every `cache_size`
    /// events. This deliberately doubles as the trace's read cache size.
    pub cache_size: usize,
    /// Polling interval for live traces, in milliseconds. 0 disables
    /// streaming: background indexing stops at end of stream instead of
    /// re-polling for growth.
    pub streaming_interval_ms: u64,
}

impl TraceConfig {
    /// Create a configuration, coercing a zero cache size to
    /// [`DEFAULT_CACHE_SIZE`].
    pub fn new(cache_size: usize, streaming_interval_ms: u64) -> Self {
        TraceConfig {
            cache_size: if cache_size > 0 {
                cache_size
            } else {
                DEFAULT_CACHE_SIZE
            },
            streaming_interval_ms,
        }
    }

    /// Configuration with the given checkpoint interval and streaming off.
    pub fn with_cache_size(cache_size: usize) -> Self {
        Self::new(cache_size, 0)
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE, 0)
    }
}
