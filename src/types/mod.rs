mod tree;

pub use tree::{join_path, normalize_path, split_path, Listing, ObjectKind, TreeEntry};
