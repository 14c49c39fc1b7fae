//! A single node of the attribute tree.

use rustc_hash::FxHashMap;

/// One named vertex in the hierarchy.
///
/// Nodes are stored in an arena (`Vec`) owned by the tree; the arena index
/// is the node's quark, and the parent back-reference is a quark handle, not
/// an owning link. Children are kept both in a fast-hash map for by-name
/// lookup and in an insertion-ordered list for deterministic traversal.
#[derive(Debug)]
pub(crate) struct AttributeNode {
    name: String,
    /// Quark of the parent; `ROOT_ATTRIBUTE` for top-level nodes.
    parent: i32,
    children: FxHashMap<String, i32>,
    child_order: Vec<i32>,
}

impl AttributeNode {
    pub(crate) fn new(name: impl Into<String>, parent: i32) -> Self {
        AttributeNode {
            name: name.into(),
            parent,
            children: FxHashMap::default(),
            child_order: Vec::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn parent(&self) -> i32 {
        self.parent
    }

    pub(crate) fn child(&self, name: &str) -> Option<i32> {
        self.children.get(name).copied()
    }

    /// Register a child. The caller guarantees the name is not yet taken;
    /// sibling names are unique by construction of the lookup path.
    pub(crate) fn add_child(&mut self, name: &str, quark: i32) {
        self.children.insert(name.to_owned(), quark);
        self.child_order.push(quark);
    }

    /// Children in insertion order.
    pub(crate) fn children_in_order(&self) -> &[i32] {
        &self.child_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_keep_insertion_order() {
        let mut node = AttributeNode::new("cpus", -1);
        node.add_child("2", 10);
        node.add_child("0", 11);
        node.add_child("1", 12);
        assert_eq!(node.children_in_order(), &[10, 11, 12]);
        assert_eq!(node.child("0"), Some(11));
        assert_eq!(node.child("3"), None);
    }
}
