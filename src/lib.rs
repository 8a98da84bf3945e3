//! gitree - a git revision as a read-only filesystem
//!
//! exposes the tree of one revision of a git repository through stat,
//! read-dir and open, without checking anything out. everything is read by
//! running the `git` command line and parsing its output.
//!
//! # Core concepts
//!
//! - **Repository**: a handle on one revision; caches each directory listing
//!   the first time it is read
//! - **TreeEntry**: one named object in a directory (directory, regular file,
//!   symlink or submodule), immutable once listed
//! - **FileSystem**: the trait a virtual-filesystem framework consumes
//! - **GitInvoker**: the seam through which git is run, replaceable in tests
//!
//! # Git commands used
//!
//! ```text
//! git [--git-dir=<dir>] ls-tree --full-tree -z -l <rev>:<path>
//! git [--git-dir=<dir>] cat-file blob <id>
//! git [--git-dir=<dir>] rev-parse <rev>^{tree}
//! git [--git-dir=<dir>] log -1 --pretty=format:%aD <rev> [-- <path>]
//! ```
//!
//! # Example usage
//!
//! ```no_run
//! use gitree::{Config, FileSystem, FileInfo, Repository};
//!
//! let repo = Repository::open(&Config::default().with_revision("v1.0")).unwrap();
//!
//! for entry in repo.read_dir("src").unwrap() {
//!     println!("{} {}", entry.path(), entry.size());
//! }
//!
//! let readme = repo.read("README.md").unwrap();
//! ```

mod config;
mod error;
mod git;
mod hash;
mod object;
mod repo;
#[cfg(test)]
mod testing;

pub mod fs;
pub mod ops;
pub mod types;

pub use config::{Config, DEFAULT_REVISION};
pub use error::{Error, Result};
pub use fs::{FileInfo, FileSystem};
pub use git::{discover_git_dir, GitCommand, GitInvoker, Output};
pub use hash::ObjectId;
pub use object::{
    last_author_date, parse_listing, parse_record, read_blob, read_tree, resolve_root_tree, Blob,
    ObjectSource, Record, RevisionObjects,
};
pub use repo::Repository;
pub use types::{Listing, ObjectKind, TreeEntry};
