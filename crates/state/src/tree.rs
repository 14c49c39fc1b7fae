//! The attribute tree: path resolution and quark allocation.

use crate::attribute::AttributeNode;
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::debug;

/// Returned for any lookup of a non-existent path when creation is not
/// requested.
pub const INVALID_ATTRIBUTE: i32 = -2;

/// Quark of the synthetic root node anchoring absolute paths.
///
/// The root is not a real attribute: it has no name, owns no quark slot in
/// the arena, and never appears in a full path. It exists so relative
/// traversals can be rooted "at the top" uniformly.
pub const ROOT_ATTRIBUTE: i32 = -1;

/// Hierarchical namespace handing out stable integer handles (quarks).
///
/// Quarks are dense arena indices assigned at node creation and never reused
/// or reassigned — other subsystems persist them as keys for the life of the
/// tree. Path creation is the only mutation; lookups are pure.
///
/// # Thread Safety
///
/// The tree is internally synchronized: lookups take a read lock, path
/// creation a write lock. Handing `&AttributeTree` to several analyses is
/// safe; quark allocation is serialized by the write lock.
///
/// # Examples
///
/// ```
/// use sediment_state::{AttributeTree, INVALID_ATTRIBUTE};
///
/// let tree = AttributeTree::new();
/// let quark = tree.get_or_create_quark(&["cpus", "0", "current_thread"], true);
/// assert!(quark >= 0);
/// // Same path, same quark — forever.
/// assert_eq!(tree.get_or_create_quark(&["cpus", "0", "current_thread"], false), quark);
/// // Misses without creation are signaled, not raised.
/// assert_eq!(tree.get_or_create_quark(&["cpus", "9"], false), INVALID_ATTRIBUTE);
/// ```
#[derive(Debug)]
pub struct AttributeTree {
    inner: RwLock<TreeInner>,
}

#[derive(Debug)]
struct TreeInner {
    /// Arena of all real nodes; the index is the quark.
    nodes: Vec<AttributeNode>,
    /// The synthetic root (quark `ROOT_ATTRIBUTE`), kept outside the arena.
    root: AttributeNode,
}

impl TreeInner {
    fn node(&self, quark: i32) -> &AttributeNode {
        if quark == ROOT_ATTRIBUTE {
            return &self.root;
        }
        match usize::try_from(quark).ok().and_then(|i| self.nodes.get(i)) {
            Some(node) => node,
            None => panic!("unknown quark {quark}: not obtained from this tree"),
        }
    }

    fn node_mut(&mut self, quark: i32) -> &mut AttributeNode {
        if quark == ROOT_ATTRIBUTE {
            return &mut self.root;
        }
        match usize::try_from(quark).ok() {
            Some(i) if i < self.nodes.len() => &mut self.nodes[i],
            _ => panic!("unknown quark {quark}: not obtained from this tree"),
        }
    }

    /// Walk `path` down from `from`. Returns the quark of the last segment,
    /// or `INVALID_ATTRIBUTE` as soon as a segment is missing.
    fn walk(&self, from: i32, path: &[&str]) -> i32 {
        let mut current = from;
        for segment in path {
            match self.node(current).child(segment) {
                Some(next) => current = next,
                None => return INVALID_ATTRIBUTE,
            }
        }
        current
    }

    /// Walk `path` down from `from`, creating every missing segment.
    fn walk_and_create(&mut self, from: i32, path: &[&str]) -> i32 {
        let mut current = from;
        for segment in path {
            match self.node(current).child(segment) {
                Some(next) => current = next,
                None => {
                    let quark = self.nodes.len() as i32;
                    self.nodes.push(AttributeNode::new(*segment, current));
                    self.node_mut(current).add_child(segment, quark);
                    debug!(name = *segment, quark, parent = current, "created attribute");
                    current = quark;
                }
            }
        }
        current
    }
}

impl AttributeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        AttributeTree {
            inner: RwLock::new(TreeInner {
                nodes: Vec::new(),
                root: AttributeNode::new("", ROOT_ATTRIBUTE),
            }),
        }
    }

    /// Resolve an absolute path to a quark, optionally creating it.
    ///
    /// Traverses from the root, one segment per level. A missing segment
    /// with `create == false` returns [`INVALID_ATTRIBUTE`] immediately,
    /// with no side effects; with `create == true`, the missing suffix is
    /// created and the new leaf's quark returned. The empty path resolves to
    /// [`ROOT_ATTRIBUTE`].
    pub fn get_or_create_quark<S: AsRef<str>>(&self, path: &[S], create: bool) -> i32 {
        self.sub_attribute_quark(ROOT_ATTRIBUTE, path, create)
    }

    /// Resolve a path relative to a known node instead of the root.
    ///
    /// This is the prefix-skipping optimization: repeated descendants of a
    /// known subtree avoid re-resolving the shared prefix.
    ///
    /// # Panics
    ///
    /// Panics if `from` is not [`ROOT_ATTRIBUTE`] or a quark obtained from
    /// this tree — that is a programming-contract violation, not a lookup
    /// miss.
    pub fn sub_attribute_quark<S: AsRef<str>>(&self, from: i32, path: &[S], create: bool) -> i32 {
        let segments: SmallVec<[&str; 8]> = path.iter().map(|s| s.as_ref()).collect();

        {
            let inner = self.inner.read();
            inner.node(from); // fail fast on an unknown starting quark
            let found = inner.walk(from, &segments);
            if found != INVALID_ATTRIBUTE || !create {
                return found;
            }
        }

        // Missing and creation requested: retake the lock for writing and
        // re-walk, since another thread may have created part of the path in
        // the meantime.
        let mut inner = self.inner.write();
        inner.walk_and_create(from, &segments)
    }

    /// The full path of `quark`, from just below the root down to the node.
    ///
    /// O(depth): walks parent links and reverses. The root resolves to the
    /// empty path.
    ///
    /// # Panics
    ///
    /// Panics on a quark that was not obtained from this tree (callers must
    /// only query quarks they were handed).
    pub fn full_attribute_path(&self, quark: i32) -> Vec<String> {
        let inner = self.inner.read();
        let mut quarks: SmallVec<[i32; 8]> = SmallVec::new();
        let mut current = quark;
        while current != ROOT_ATTRIBUTE {
            quarks.push(current);
            current = inner.node(current).parent();
        }
        quarks
            .iter()
            .rev()
            .map(|q| inner.node(*q).name().to_owned())
            .collect()
    }

    /// The full path of `quark` as a single slash-separated string.
    pub fn full_attribute_name(&self, quark: i32) -> String {
        self.full_attribute_path(quark).join("/")
    }

    /// The base name of `quark`.
    pub fn attribute_name(&self, quark: i32) -> String {
        self.inner.read().node(quark).name().to_owned()
    }

    /// The parent quark of `quark` ([`ROOT_ATTRIBUTE`] for top-level nodes).
    pub fn parent_quark(&self, quark: i32) -> i32 {
        self.inner.read().node(quark).parent()
    }

    /// The direct children of `quark`, in creation order.
    pub fn sub_attribute_quarks(&self, quark: i32) -> Vec<i32> {
        self.inner.read().node(quark).children_in_order().to_vec()
    }

    /// Total number of attributes ever created (quarks are dense: the next
    /// quark to be allocated equals this count).
    pub fn num_attributes(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Whether no attribute has been created yet.
    pub fn is_empty(&self) -> bool {
        self.num_attributes() == 0
    }

    /// Indented `name (quark)` rendering of the whole tree, for diagnostics.
    pub fn debug_dump(&self) -> String {
        let inner = self.inner.read();
        let mut out = String::new();
        for &child in inner.root.children_in_order() {
            dump_node(&inner, child, 0, &mut out);
        }
        out
    }
}

fn dump_node(inner: &TreeInner, quark: i32, depth: usize, out: &mut String) {
    let node = inner.node(quark);
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&format!("{} ({})\n", node.name(), quark));
    for &child in node.children_in_order() {
        dump_node(inner, child, depth + 1, out);
    }
}

impl Default for AttributeTree {
    fn default() -> Self {
        Self::new()
    }
}
