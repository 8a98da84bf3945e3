use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::git::{discover_git_dir, GitCommand, GitInvoker};
use crate::object::{read_tree, resolve_root_tree, Blob, ObjectSource, RevisionObjects};
use crate::types::{normalize_path, split_path, Listing, TreeEntry};

/// read-only view of one revision of a git repository
///
/// directory listings are fetched from git on first use and kept for the
/// life of the handle. the caches are plain `RefCell`s, so a handle belongs
/// to one caller at a time; share it across threads only behind your own
/// lock, or give each worker its own handle.
pub struct Repository {
    git: Rc<dyn GitInvoker>,
    git_dir: Option<PathBuf>,
    revision: String,
    source: Rc<dyn ObjectSource>,
    root: RefCell<Option<Rc<TreeEntry>>>,
    trees: RefCell<HashMap<String, Rc<Listing>>>,
}

impl Repository {
    /// open a view as described by `config`
    ///
    /// an unset git dir is discovered once, here, from the working directory;
    /// an unset revision means `HEAD`.
    pub fn open(config: &Config) -> Result<Self> {
        let git_dir = match &config.git_dir {
            Some(dir) => dir.clone(),
            None => discover_git_dir(&GitCommand::new(config.git_binary.as_str()))?,
        };
        debug!(git_dir = %git_dir.display(), revision = config.revision(), "opening repository");

        let git = GitCommand::new(config.git_binary.as_str()).with_git_dir(&git_dir);
        let mut repo = Self::with_invoker(Rc::new(git), config.revision());
        repo.git_dir = Some(git_dir);
        Ok(repo)
    }

    /// view `revision` through an arbitrary invoker
    pub fn with_invoker(git: Rc<dyn GitInvoker>, revision: impl Into<String>) -> Self {
        let revision = revision.into();
        let source: Rc<dyn ObjectSource> =
            Rc::new(RevisionObjects::new(Rc::clone(&git), revision.clone()));
        Self {
            git,
            git_dir: None,
            revision,
            source,
            root: RefCell::new(None),
            trees: RefCell::new(HashMap::new()),
        }
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn git_dir(&self) -> Option<&Path> {
        self.git_dir.as_deref()
    }

    /// entries of directory `path`, keyed by base name
    ///
    /// a listing is cached only after every record parsed; a failed listing
    /// leaves nothing behind and is retried on the next call.
    pub fn list_directory(&self, path: &str) -> Result<Rc<Listing>> {
        let path = normalize_path(path);

        if let Some(listing) = self.trees.borrow().get(path) {
            trace!(path, "tree listing cached");
            return Ok(Rc::clone(listing));
        }

        debug!(path, revision = %self.revision, "listing tree");
        let listing = Rc::new(read_tree(
            self.git.as_ref(),
            &self.revision,
            path,
            &self.source,
        )?);
        self.trees
            .borrow_mut()
            .insert(path.to_string(), Rc::clone(&listing));
        Ok(listing)
    }

    /// look up the entry at `path`; `""` and `"."` are the root tree
    ///
    /// symlinks are returned as themselves, never followed.
    pub fn resolve(&self, path: &str) -> Result<Rc<TreeEntry>> {
        let path = normalize_path(path);
        if path.is_empty() {
            return self.root();
        }

        let (parent, name) = split_path(path);
        let listing = match self.list_directory(parent) {
            Ok(listing) => listing,
            Err(e @ Error::ExternalTool { .. }) if !parent.is_empty() => {
                // git refuses to list a missing or non-directory parent; only
                // then walk up to tell a missing path from a real failure
                return match self.resolve(parent) {
                    Ok(dir) if dir.is_dir() => Err(e),
                    Ok(_) => Err(Error::NotFound(path.to_string())),
                    Err(parent_err) if parent_err.is_not_found() => {
                        Err(Error::NotFound(path.to_string()))
                    }
                    Err(_) => Err(e),
                };
            }
            Err(e) => return Err(e),
        };

        listing
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    /// entries of directory `path` in ascending name order
    pub fn list_entries(&self, path: &str) -> Result<Vec<Rc<TreeEntry>>> {
        let listing = self.list_directory(path)?;
        Ok(listing.values().cloned().collect())
    }

    /// content of the regular file at `path`
    pub fn open_file(&self, path: &str) -> Result<Blob> {
        let entry = self.resolve(path)?;
        if !entry.is_regular() {
            return Err(Error::NotRegularFile(normalize_path(path).to_string()));
        }
        let data = entry.source().read_blob(&entry.id())?;
        Ok(Blob::new(data))
    }

    /// best-effort modification time; the epoch when git can't say
    pub fn mod_time(&self, entry: &TreeEntry) -> DateTime<FixedOffset> {
        entry.mod_time()
    }

    /// number of directories whose listing is cached
    pub fn cached_directories(&self) -> usize {
        self.trees.borrow().len()
    }

    fn root(&self) -> Result<Rc<TreeEntry>> {
        if let Some(root) = self.root.borrow().as_ref() {
            return Ok(Rc::clone(root));
        }

        let id = resolve_root_tree(self.git.as_ref(), &self.revision)?;
        let root = Rc::new(TreeEntry::root(id, Rc::clone(&self.source)));
        *self.root.borrow_mut() = Some(Rc::clone(&root));
        Ok(root)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git[rev={}]", self.revision)
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("revision", &self.revision)
            .field("cached_directories", &self.cached_directories())
            .finish()
    }
}
