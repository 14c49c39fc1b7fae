//! Core types for sediment
//!
//! This crate defines the fundamental types shared by the indexing and
//! trace-reading layers:
//! - [`Timestamp`] / [`TimeRange`]: trace time and its sentinel bounds
//! - [`Event`]: one parsed record of the event stream
//! - [`Location`]: the opaque, format-defined stream position
//! - [`TraceContext`]: a cloneable cursor (location + ordinal rank)
//! - [`TraceConfig`]: construction-time configuration
//! - [`CoreError`]: the error taxonomy for trace operations

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod location;
pub mod time;

pub use config::{TraceConfig, DEFAULT_CACHE_SIZE};
pub use context::TraceContext;
pub use error::{CoreError, Result};
pub use event::Event;
pub use location::Location;
pub use time::{TimeRange, Timestamp};
