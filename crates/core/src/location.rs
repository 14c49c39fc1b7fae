//! Opaque stream positions
//!
//! A location is a format-defined position token: a byte offset, an ordinal
//! into an in-memory buffer, a (file, offset) pair. The core never inspects
//! one; it only clones them into checkpoints and compares them for equality
//! in tests. Each trace format picks its location type at construction,
//! through its parser's associated type.

use std::fmt::Debug;

/// The capability set a stream position must provide.
///
/// The three capabilities the seek protocol relies on are cloning (contexts
/// are snapshotted heavily while probing), comparison (equality of positions)
/// and cheap disposal (locations are plain data; any scoped resource such as
/// an open scan handle belongs to the parser, so dropping a location must be
/// trivially safe). Locations are owned value tokens — `Send + Sync +
/// 'static` — because checkpoints holding them are shared between the
/// indexing thread and searchers. The blanket impl below means any suitable
/// type is a location; no explicit opt-in is needed.
pub trait Location: Clone + PartialEq + Debug + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Debug + Send + Sync + 'static> Location for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_location<L: Location>() {}

    #[test]
    fn test_blanket_impl_covers_plain_tokens() {
        assert_location::<u64>();
        assert_location::<usize>();
        assert_location::<(u32, u64)>();
        assert_location::<String>();
    }
}
