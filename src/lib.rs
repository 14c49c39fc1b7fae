//! # Sediment
//!
//! Checkpoint-indexed trace reading with quark-addressed attribute trees.
//!
//! Sediment ingests large, strictly time-ordered event streams and provides
//! the two things a sequential reader cannot:
//!
//! 1. **Random access** by ordinal rank or timestamp, through a sparse
//!    checkpoint index built while the trace is scanned, and
//! 2. **Stable integer naming** for hierarchical attributes of the traced
//!    system, so analyses address state by small quark handles instead of
//!    string paths.
//!
//! ## Quick Start
//!
//! ```
//! use sediment::prelude::*;
//!
//! # fn main() -> sediment::Result<()> {
//! // A deterministic in-memory trace: 10 events, 10ns apart.
//! let trace = TraceBuilder::new()
//!     .cache_size(3)
//!     .build(MemoryParser::generate(10, 0, 10))?;
//!
//! // Index it, then seek by rank or timestamp.
//! trace.build_index(0, TimeRange::ETERNITY)?;
//! let mut ctx = trace.seek_rank(7)?;
//! let event = trace.get_next(&mut ctx)?.unwrap();
//! assert_eq!(event.timestamp(), Timestamp::from_nanos(70));
//!
//! // Quarks: stable handles for hierarchical attributes.
//! let tree = AttributeTree::new();
//! let quark = tree.get_or_create_quark(&["cpus", "0", "current_thread"], true);
//! assert_eq!(tree.full_attribute_name(quark), "cpus/0/current_thread");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod error;

pub mod prelude;

// Re-export main entry points
pub use builder::TraceBuilder;
pub use error::{Error, Result};

// Re-export the trace layer
pub use sediment_trace::{
    ByteLocation, EventHook, EventParser, EventRequest, IndexingHandle, JsonlParser,
    MemoryLocation, MemoryParser, Trace, TraceStatistics,
};

// Re-export the attribute tree
pub use sediment_state::{AttributeTree, INVALID_ATTRIBUTE, ROOT_ATTRIBUTE};

// Re-export the index layer
pub use sediment_index::{persist, Checkpoint, CheckpointCollection, CheckpointIndexer};

// Re-export core types
pub use sediment_core::{
    Event, Location, TimeRange, Timestamp, TraceConfig, TraceContext, DEFAULT_CACHE_SIZE,
};
