//! The parser contract between a trace and its format-specific reader.

use sediment_core::{Event, Location, Result};

/// Produces events from raw stream positions.
///
/// The parser is the external collaborator that knows the trace format; the
/// trace knows nothing about byte layouts and the parser nothing about
/// ranks, checkpoints, or metadata.
///
/// # Contract
///
/// - `parse_at` is **pure** with respect to the passed location and
///   deterministic: the same location always yields the same event and the
///   same successor location. (Internal caching is fine; observable state
///   is not.)
/// - `Ok(None)` means end of stream — the only recoverable "failure".
///   Parsers handle their own recoverable errors internally; an `Err` is
///   unrecoverable and fatal to the current read operation.
pub trait EventParser: Send + Sync {
    /// The opaque position token for this format.
    type Location: Location;

    /// The position of the first event.
    fn start_location(&self) -> Self::Location;

    /// Parse the event at `location`, returning it together with the
    /// location of the event after it, or `None` at end of stream.
    fn parse_at(&self, location: &Self::Location) -> Result<Option<(Event, Self::Location)>>;
}
