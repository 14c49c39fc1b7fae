//! Attribute tree with integer quark addressing
//!
//! Analyses layered on top of a trace address facts about the traced system
//! ("the thread currently running on CPU 0") by hierarchical path. Resolving
//! string paths on every access would dominate; instead the tree hands out
//! *quarks* — stable, densely-allocated integers — the first time a path is
//! seen, and those quarks stay valid for the life of the tree.
//!
//! The tree has no dependency on the trace layer; it is used independently
//! by consumers that persist quarks as keys and resolve them back to paths
//! only for diagnostics.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod attribute;
pub mod tree;

pub use tree::{AttributeTree, INVALID_ATTRIBUTE, ROOT_ATTRIBUTE};
