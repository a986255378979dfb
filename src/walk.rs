//! Path resolution over the node store.

use generational_arena::Index;
use tracing::instrument;

use crate::arena::TreeArena;
use crate::path;

/// Outcome of a walk: the deepest node reached and how many segments matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    pub node: Index,
    pub consumed: usize,
}

impl Walk {
    /// True when every one of `total` segments was matched.
    pub fn is_complete(&self, total: usize) -> bool {
        self.consumed == total
    }
}

impl TreeArena {
    /// Linear scan of `parent`'s children in insertion order for an exact
    /// name match. Sibling names are unique, so the first hit is the only one.
    pub fn find_child(&self, parent: Index, name: &str) -> Option<Index> {
        self.get_node(parent)?
            .children
            .iter()
            .copied()
            .find(|&child| self.get_node(child).is_some_and(|n| n.name == name))
    }

    /// Descends from `start` one segment at a time and stops at the first
    /// segment with no matching child.
    #[instrument(level = "trace", skip(self))]
    pub fn walk(&self, start: Index, segments: &[&str]) -> Walk {
        let mut node = start;
        let mut consumed = 0;
        for segment in segments {
            match self.find_child(node, segment) {
                Some(child) => {
                    node = child;
                    consumed += 1;
                }
                None => break,
            }
        }
        Walk { node, consumed }
    }

    /// Index of the node at `segments` from the root, if the whole path exists.
    pub fn resolve(&self, segments: &[&str]) -> Option<Index> {
        let walk = self.walk(self.root(), segments);
        walk.is_complete(segments.len()).then_some(walk.node)
    }

    /// Canonical path of `idx`, rebuilt by following parent links upwards.
    pub fn path_of(&self, idx: Index) -> String {
        let mut names = Vec::new();
        let mut current = self.get_node(idx);
        while let Some(node) = current {
            if node.parent.is_none() {
                break;
            }
            names.push(node.name.as_str());
            current = node.parent.and_then(|p| self.get_node(p));
        }
        names.reverse();
        path::join(names)
    }

    /// True if `idx` is `ancestor` or lies below it.
    pub fn is_within(&self, idx: Index, ancestor: Index) -> bool {
        let mut current = Some(idx);
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.get_node(i).and_then(|n| n.parent);
        }
        false
    }
}
