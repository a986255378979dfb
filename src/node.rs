//! Borrowed views onto nodes of a [`PathTree`](crate::PathTree).

use std::fmt;

use generational_arena::Index;

use crate::arena::{TreeArena, TreeNode};

/// Read-only handle to a node and, through it, its subtree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a TreeArena,
    idx: Index,
    node: &'a TreeNode,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(arena: &'a TreeArena, idx: Index) -> Option<Self> {
        let node = arena.get_node(idx)?;
        Some(Self { arena, idx, node })
    }

    pub fn index(&self) -> Index {
        self.idx
    }

    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    pub fn value(&self) -> i64 {
        self.node.value
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn path(&self) -> String {
        self.arena.path_of(self.idx)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|p| NodeRef::new(self.arena, p))
    }

    /// Direct children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let arena = self.arena;
        let node = self.node;
        node.children
            .iter()
            .filter_map(move |&c| NodeRef::new(arena, c))
    }

    pub fn child(&self, name: &str) -> Option<NodeRef<'a>> {
        self.arena
            .find_child(self.idx, name)
            .and_then(|c| NodeRef::new(self.arena, c))
    }

    /// Node count of this subtree, this node included.
    pub fn len(&self) -> usize {
        self.arena.subtree_len(self.idx)
    }

    pub fn is_leaf(&self) -> bool {
        self.node.children.is_empty()
    }

    pub(crate) fn arena(&self) -> &'a TreeArena {
        self.arena
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("path", &self.path())
            .field("value", &self.node.value)
            .field("children", &self.node.children.len())
            .finish()
    }
}

/// Mutable handle to a single node. Structure stays fixed; only the value
/// can change.
#[derive(Debug)]
pub struct NodeMut<'a> {
    node: &'a mut TreeNode,
    path: String,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(arena: &'a mut TreeArena, idx: Index) -> Option<Self> {
        let path = arena.path_of(idx);
        let node = arena.get_node_mut(idx)?;
        Some(Self { node, path })
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn value(&self) -> i64 {
        self.node.value
    }

    pub fn set_value(&mut self, value: i64) {
        self.node.value = value;
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
