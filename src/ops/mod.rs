//! higher-level operations built on the filesystem surface

mod ls_tree;

pub use ls_tree::{ls_tree, LsTreeEntry};
