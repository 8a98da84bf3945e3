//! the filesystem surface a virtual-filesystem framework talks to

pub mod read;

use std::io::{Read, Seek};
use std::rc::Rc;

use crate::error::{IoResultExt, Result};
use crate::object::Blob;
use crate::repo::Repository;
use crate::types::TreeEntry;

pub use read::FileInfo;

/// read-only filesystem operations
///
/// paths are relative to the filesystem root; `""` and `"."` name the root.
pub trait FileSystem {
    type Entry: FileInfo;
    type Reader: Read + Seek;

    fn stat(&self, path: &str) -> Result<Self::Entry>;

    /// like `stat`, but a symlink is reported as itself
    fn lstat(&self, path: &str) -> Result<Self::Entry>;

    /// directory entries sorted by name
    fn read_dir(&self, path: &str) -> Result<Vec<Self::Entry>>;

    fn open(&self, path: &str) -> Result<Self::Reader>;

    /// whole content of a file
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let mut reader = self.open(path)?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).with_path(path)?;
        Ok(buf)
    }

    /// whether `path` exists; errors other than not-found are passed on
    fn exists(&self, path: &str) -> Result<bool> {
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// identity string for logs and diagnostics
    fn describe(&self) -> String;
}

// symlinks are not followed, so stat and lstat agree
impl FileSystem for Repository {
    type Entry = Rc<TreeEntry>;
    type Reader = Blob;

    fn stat(&self, path: &str) -> Result<Self::Entry> {
        self.resolve(path)
    }

    fn lstat(&self, path: &str) -> Result<Self::Entry> {
        self.resolve(path)
    }

    fn read_dir(&self, path: &str) -> Result<Vec<Self::Entry>> {
        self.list_entries(path)
    }

    fn open(&self, path: &str) -> Result<Self::Reader> {
        self.open_file(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.open_file(path)?.into_inner())
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}
