use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::node::NodeRef;
use crate::tree::PathTree;

/// How nodes are labelled when a tree is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append ` = <value>` to every label
    pub show_values: bool,
    /// Label used for the root node
    pub root_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_values: true,
            root_label: "/".to_string(),
        }
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_with(&RenderOptions::default())
    }

    fn to_tree_with(&self, options: &RenderOptions) -> Tree<String>;
}

fn label(name: &str, value: i64, is_root: bool, options: &RenderOptions) -> String {
    let name = if is_root { options.root_label.as_str() } else { name };
    if options.show_values {
        format!("{} = {}", name, value)
    } else {
        name.to_string()
    }
}

impl TreeNodeConvert for NodeRef<'_> {
    /// Builds bottom-up from a post-order walk, so deep trees need no
    /// call-stack recursion.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_with(&self, options: &RenderOptions) -> Tree<String> {
        let mut built: HashMap<Index, Tree<String>> = HashMap::new();

        for (idx, node) in self.arena().iter_postorder_from(self.index()) {
            let leaves: Vec<Tree<String>> = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            let text = label(&node.name, node.value, node.parent.is_none(), options);
            built.insert(idx, Tree::new(text).with_leaves(leaves));
        }

        built
            .remove(&self.index())
            .unwrap_or_else(|| Tree::new(label(self.name(), self.value(), self.is_root(), options)))
    }
}

impl TreeNodeConvert for PathTree {
    fn to_tree_with(&self, options: &RenderOptions) -> Tree<String> {
        self.root().to_tree_with(options)
    }
}
