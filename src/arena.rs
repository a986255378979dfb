use std::collections::TryReserveError;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Path segment this node was created under, empty for the root
    pub name: String,
    /// Integer payload
    pub value: i64,
    /// Index of parent node in the arena, None for the root. Never owning.
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

impl TreeNode {
    fn new(name: String, value: i64, parent: Option<Index>, children: Vec<Index>) -> Self {
        Self {
            name,
            value,
            parent,
            children,
        }
    }
}

/// Arena-based node store.
///
/// Owns every node of one tree. Ownership flows strictly parent to child
/// through `children`; a node is freed only by removing its subtree.
/// There is always exactly one root.
///
/// Structural edits stay inside the crate, so sibling names remain unique
/// and parent links stay consistent:
///
/// ```compile_fail
/// let mut arena = pathtree::arena::TreeArena::new();
/// let root = arena.root();
/// arena.insert_child(root, "a".to_string(), 0);
/// ```
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Index,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode::new(String::new(), 0, None, Vec::new()));
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Allocated slots, live or free.
    pub(crate) fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub(crate) fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    /// Appends a new child under `parent`.
    ///
    /// Returns None if `parent` is not a live node.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_child(
        &mut self,
        parent: Index,
        name: String,
        value: i64,
    ) -> Option<Index> {
        if !self.arena.contains(parent) {
            return None;
        }
        let node_idx = self
            .arena
            .insert(TreeNode::new(name, value, Some(parent), Vec::new()));
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        Some(node_idx)
    }

    /// Creates a chain of nodes below `parent`, one per name, and returns the
    /// last one (or `parent` itself if `names` is empty).
    ///
    /// Every heap allocation the chain needs is reserved before the first node
    /// is attached. On failure nothing is attached and the tree is unchanged.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn try_insert_chain(
        &mut self,
        parent: Index,
        names: &[&str],
    ) -> Result<Index, TryReserveError> {
        if names.is_empty() {
            return Ok(parent);
        }

        let mut pending: Vec<(String, Vec<Index>)> = Vec::new();
        pending.try_reserve_exact(names.len())?;
        for (i, name) in names.iter().enumerate() {
            let mut owned = String::new();
            owned.try_reserve_exact(name.len())?;
            owned.push_str(name);
            let mut children = Vec::new();
            if i + 1 < names.len() {
                children.try_reserve_exact(1)?;
            }
            pending.push((owned, children));
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.try_reserve(1)?;
        }
        let spare = self.arena.capacity() - self.arena.len();
        if names.len() > spare {
            // `Arena::reserve` always appends slots, so only ask for the shortfall
            self.arena.reserve(names.len() - spare);
        }

        let mut current = parent;
        for (name, children) in pending {
            let idx = self
                .arena
                .insert(TreeNode::new(name, 0, Some(current), children));
            if let Some(node) = self.arena.get_mut(current) {
                node.children.push(idx);
            }
            current = idx;
        }
        debug!("created {} node(s)", names.len());
        Ok(current)
    }

    /// Unlinks `idx` from its parent's children. Remaining siblings keep
    /// their relative order. The node itself stays allocated.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn detach(&mut self, idx: Index) {
        let Some(parent_idx) = self.arena.get_mut(idx).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.arena.get_mut(parent_idx) {
            if let Some(pos) = parent.children.iter().position(|&c| c == idx) {
                parent.children.remove(pos);
            }
        }
    }

    /// Frees `idx` and every descendant, deepest first, with an explicit work
    /// list. Callers detach first unless the whole tree is going away.
    ///
    /// Returns the number of freed nodes.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn remove_subtree(&mut self, idx: Index) -> usize {
        let mut stack = vec![(idx, false)];
        let mut freed = 0;

        while let Some((current_idx, expanded)) = stack.pop() {
            if expanded {
                if self.arena.remove(current_idx).is_some() {
                    freed += 1;
                }
                continue;
            }
            if let Some(node) = self.arena.get(current_idx) {
                stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }
        freed
    }

    /// Frees every child subtree of `idx`, leaving `idx` a leaf.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn clear_children(&mut self, idx: Index) -> usize {
        let children = match self.arena.get_mut(idx) {
            Some(node) => std::mem::take(&mut node.children),
            None => return 0,
        };
        children
            .into_iter()
            .map(|child| self.remove_subtree(child))
            .sum()
    }

    /// Moves the children of `src_parent` (with their subtrees) out of `src`
    /// and appends them below `dst_parent` in `dst`, preserving order.
    ///
    /// Nodes are moved, never cloned, so nothing is reachable from both
    /// arenas afterwards. Returns the number of moved nodes.
    #[instrument(level = "trace", skip(src, dst))]
    pub(crate) fn transplant_children(
        src: &mut TreeArena,
        src_parent: Index,
        dst: &mut TreeArena,
        dst_parent: Index,
    ) -> usize {
        let roots = match src.arena.get_mut(src_parent) {
            Some(node) => std::mem::take(&mut node.children),
            None => return 0,
        };
        let mut stack: Vec<(Index, Index)> =
            roots.into_iter().rev().map(|c| (c, dst_parent)).collect();
        let mut moved = 0;

        while let Some((src_idx, new_parent)) = stack.pop() {
            let Some(TreeNode {
                name,
                value,
                children,
                ..
            }) = src.arena.remove(src_idx)
            else {
                continue;
            };
            let Some(new_idx) = dst.insert_child(new_parent, name, value) else {
                continue;
            };
            moved += 1;
            stack.extend(children.into_iter().rev().map(|c| (c, new_idx)));
        }
        moved
    }

    /// Counts the nodes of the subtree rooted at `idx`.
    pub fn subtree_len(&self, idx: Index) -> usize {
        self.iter_from(idx).count()
    }

    /// Number of levels in the tree; the root alone has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1)];

        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.arena.get(idx) {
                max_depth = max_depth.max(depth);
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order iteration over the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, idx)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.root)
    }

    pub fn iter_postorder_from(&self, idx: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, idx)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
