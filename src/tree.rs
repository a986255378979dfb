use std::fmt;

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::arena::{PostOrderIterator, TreeArena};
use crate::errors::{TreeError, TreeResult};
use crate::node::{NodeMut, NodeRef};
use crate::path;
use crate::tree_traits::TreeNodeConvert;

/// Hierarchical namespace mapping `/`-delimited paths to `i64` values.
///
/// Writes create missing path segments on demand. Every tree has exactly one
/// root, addressed by `""` or `"/"`. Subtrees move between trees only by
/// value (see [`PathTree::set_node`]), so two trees never share nodes.
///
/// ```
/// use pathtree::PathTree;
///
/// let mut tree = PathTree::new();
/// tree.set_data("/a/b/c", 45)?;
/// assert_eq!(tree.get_data("/a/b/c")?, 45);
/// assert_eq!(tree.get_data("/a")?, 0);
/// assert!(tree.get_data("/a/x").is_err());
/// # Ok::<(), pathtree::TreeError>(())
/// ```
#[derive(Debug, Default)]
pub struct PathTree {
    arena: TreeArena,
}

impl PathTree {
    pub fn new() -> Self {
        Self {
            arena: TreeArena::new(),
        }
    }

    /// Builds a tree by calling [`set_data`](Self::set_data) for each entry in order.
    pub fn from_entries<I, P>(entries: I) -> TreeResult<Self>
    where
        I: IntoIterator<Item = (P, i64)>,
        P: AsRef<str>,
    {
        let mut tree = Self::new();
        for (path, value) in entries {
            tree.set_data(path.as_ref(), value)?;
        }
        Ok(tree)
    }

    fn resolve(&self, path: &str) -> TreeResult<Index> {
        let segments = path::tokenize(path);
        self.arena
            .resolve(&segments)
            .ok_or_else(|| TreeError::NotFound(path::join(&segments)))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_data(&self, path: &str) -> TreeResult<i64> {
        let idx = self.resolve(path)?;
        self.arena
            .get_node(idx)
            .map(|node| node.value)
            .ok_or_else(|| TreeError::NotFound(path::normalize(path)))
    }

    /// Stores `value` at `path`, creating every missing segment first.
    ///
    /// On [`TreeError::AllocationFailure`] no node has been attached.
    #[instrument(level = "debug", skip(self))]
    pub fn set_data(&mut self, path: &str, value: i64) -> TreeResult<()> {
        let segments = path::tokenize(path);
        let walk = self.arena.walk(self.arena.root(), &segments);
        let missing = &segments[walk.consumed..];
        if !missing.is_empty() {
            debug!(
                "auto-creating {} segment(s) below {}",
                missing.len(),
                self.arena.path_of(walk.node)
            );
        }

        let target = self
            .arena
            .try_insert_chain(walk.node, missing)
            .map_err(|e| {
                warn!("node allocation failed: {}", e);
                TreeError::AllocationFailure(path::join(&segments))
            })?;

        match self.arena.get_node_mut(target) {
            Some(node) => {
                node.value = value;
                Ok(())
            }
            None => Err(TreeError::NotFound(path::join(&segments))),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_node(&self, path: &str) -> TreeResult<NodeRef<'_>> {
        let idx = self.resolve(path)?;
        NodeRef::new(&self.arena, idx).ok_or_else(|| TreeError::NotFound(path::normalize(path)))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_node_mut(&mut self, path: &str) -> TreeResult<NodeMut<'_>> {
        let idx = self.resolve(path)?;
        NodeMut::new(&mut self.arena, idx).ok_or_else(|| TreeError::NotFound(path::normalize(path)))
    }

    /// Replaces the value and children of the node at `path` with those of
    /// `other`'s root. The node keeps its name and its place in this tree.
    ///
    /// `other` is consumed: its nodes move into this tree and the previous
    /// children of the target are deleted.
    #[instrument(level = "debug", skip(self, other))]
    pub fn set_node(&mut self, path: &str, mut other: PathTree) -> TreeResult<()> {
        let target = self.resolve(path)?;
        let other_root = other.arena.root();
        let value = other
            .arena
            .get_node(other_root)
            .map(|n| n.value)
            .unwrap_or_default();

        let freed = self.arena.clear_children(target);
        let moved =
            TreeArena::transplant_children(&mut other.arena, other_root, &mut self.arena, target);
        if let Some(node) = self.arena.get_node_mut(target) {
            node.value = value;
        }
        debug!(
            "replaced subtree at {}: {} node(s) freed, {} moved in",
            path::normalize(path),
            freed,
            moved
        );
        Ok(())
    }

    /// Detaches the subtree at `path` and returns it as a standalone tree.
    ///
    /// The returned root carries the node's value and children; its name is
    /// empty like any root.
    #[instrument(level = "debug", skip(self))]
    pub fn take_node(&mut self, path: &str) -> TreeResult<PathTree> {
        if path::is_root(path) {
            return Err(TreeError::InvalidOperation(
                "cannot take the root".to_string(),
            ));
        }
        let idx = self.resolve(path)?;
        let value = self.arena.get_node(idx).map(|n| n.value).unwrap_or_default();

        self.arena.detach(idx);
        let mut taken = PathTree::new();
        let taken_root = taken.arena.root();
        TreeArena::transplant_children(&mut self.arena, idx, &mut taken.arena, taken_root);
        self.arena.remove_subtree(idx);
        if let Some(root) = taken.arena.get_node_mut(taken_root) {
            root.value = value;
        }
        debug!("took {} node(s) from {}", taken.len(), path::normalize(path));
        Ok(taken)
    }

    /// Moves the subtree at `from` onto the node at `to`, with
    /// [`set_node`](Self::set_node) semantics at the destination.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, from: &str, to: &str) -> TreeResult<()> {
        if path::is_root(from) {
            return Err(TreeError::InvalidOperation(
                "cannot move the root".to_string(),
            ));
        }
        let src = self.resolve(from)?;
        let dst = self.resolve(to)?;
        if self.arena.is_within(dst, src) {
            return Err(TreeError::InvalidOperation(format!(
                "cannot move {} into its own subtree {}",
                path::normalize(from),
                path::normalize(to)
            )));
        }
        let subtree = self.take_node(from)?;
        self.set_node(to, subtree)
    }

    /// Detaches the node at `path` from its parent and frees it together with
    /// all descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, path: &str) -> TreeResult<()> {
        if path::is_root(path) {
            return Err(TreeError::InvalidOperation(
                "cannot remove the root".to_string(),
            ));
        }
        let idx = self.resolve(path)?;
        self.arena.detach(idx);
        let freed = self.arena.remove_subtree(idx);
        debug!("removed {}: {} node(s) freed", path::normalize(path), freed);
        Ok(())
    }

    /// Frees every node, deepest first, root last.
    ///
    /// Dropping a tree releases the same memory; this form makes the
    /// teardown order explicit and logs it.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(mut self) {
        let root = self.arena.root();
        let freed = self.arena.remove_subtree(root);
        debug!("deleted tree: {} node(s) freed", freed);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(&self.arena, self.arena.root())
            .unwrap_or_else(|| unreachable!("a tree always has a root"))
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.arena.depth()
    }

    /// Canonical paths of all leaf nodes in pre-order.
    ///
    /// A tree holding only its root reports `["/"]`.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_paths(&self) -> Vec<String> {
        self.iter_nodes()
            .filter(|node| node.is_leaf())
            .map(|node| node.path())
            .collect()
    }

    /// Pre-order `(path, value)` pairs, root first, siblings in insertion order.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            arena: &self.arena,
            stack: vec![(self.arena.root(), path::SEPARATOR.to_string())],
        }
    }

    /// Pre-order node views.
    pub fn iter_nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        let arena = &self.arena;
        arena
            .iter()
            .filter_map(move |(idx, _)| NodeRef::new(arena, idx))
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        self.arena.iter_postorder()
    }
}

impl fmt::Display for PathTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string())
    }
}

impl<'a> IntoIterator for &'a PathTree {
    type Item = (String, i64);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over `(path, value)` pairs of a [`PathTree`].
pub struct Entries<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, String)>,
}

impl Iterator for Entries<'_> {
    type Item = (String, i64);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, node_path)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(idx) {
                for &child in node.children.iter().rev() {
                    if let Some(child_node) = self.arena.get_node(child) {
                        self.stack
                            .push((child, path::child_of(&node_path, &child_node.name)));
                    }
                }
                return Some((node_path, node.value));
            }
        }
        None
    }
}
