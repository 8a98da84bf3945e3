//! reading git objects of one revision through a [`GitInvoker`]

pub mod blob;
pub mod commit;
pub mod tree;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset};
use tracing::trace;

use crate::error::Result;
use crate::git::GitInvoker;
use crate::hash::ObjectId;

pub use blob::{read_blob, Blob};
pub use commit::{last_author_date, resolve_root_tree};
pub use tree::{parse_listing, parse_record, read_tree, Record};

/// lookups a tree entry may need after it has been listed
///
/// entries hold this instead of the whole repository handle.
pub trait ObjectSource {
    /// raw content of a blob
    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>>;

    /// author date of the last change to `path` ("" for the root)
    fn last_modified(&self, path: &str) -> Result<DateTime<FixedOffset>>;
}

/// object access pinned to a single revision
pub struct RevisionObjects {
    git: Rc<dyn GitInvoker>,
    revision: String,
    mod_times: RefCell<HashMap<String, DateTime<FixedOffset>>>,
}

impl RevisionObjects {
    pub fn new(git: Rc<dyn GitInvoker>, revision: impl Into<String>) -> Self {
        Self {
            git,
            revision: revision.into(),
            mod_times: RefCell::new(HashMap::new()),
        }
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }
}

impl ObjectSource for RevisionObjects {
    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>> {
        read_blob(self.git.as_ref(), id)
    }

    fn last_modified(&self, path: &str) -> Result<DateTime<FixedOffset>> {
        if let Some(time) = self.mod_times.borrow().get(path) {
            trace!(path, "modification time cached");
            return Ok(*time);
        }

        let time = last_author_date(self.git.as_ref(), &self.revision, path)?;
        self.mod_times.borrow_mut().insert(path.to_string(), time);
        Ok(time)
    }
}
