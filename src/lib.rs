//! Path-addressed tree.
//!
//! A [`PathTree`] maps `/`-delimited paths to `i64` values. Writing a path
//! creates every missing segment, subtrees can be replaced or moved by value,
//! and removal frees a node with all its descendants.
//!
//! Layout:
//! - [`path`]: tokenizer
//! - [`walk`]: path resolution
//! - [`arena`]: node store
//! - [`tree`]: public API

pub mod arena;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod node;
pub mod path;
pub mod script;
pub mod tree;
pub mod tree_traits;
pub mod util;
pub mod walk;

pub use errors::{TreeError, TreeResult};
pub use node::{NodeMut, NodeRef};
pub use tree::{Entries, PathTree};
pub use tree_traits::{RenderOptions, TreeNodeConvert};
