//! Convenience re-exports for the common path.
//!
//! ```
//! use sediment::prelude::*;
//! ```

pub use crate::builder::TraceBuilder;
pub use crate::error::{Error, Result};
pub use sediment_core::{Event, TimeRange, Timestamp, TraceConfig, TraceContext};
pub use sediment_state::{AttributeTree, INVALID_ATTRIBUTE, ROOT_ATTRIBUTE};
pub use sediment_trace::{
    EventParser, EventRequest, JsonlParser, MemoryParser, Trace, TraceStatistics,
};
