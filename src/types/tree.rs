use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::debug;

use crate::hash::ObjectId;
use crate::object::ObjectSource;

/// one directory listing: base name -> entry, iterated in name order
pub type Listing = BTreeMap<String, Rc<TreeEntry>>;

/// kind of object a tree entry points at, from the high bits of its mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Directory,
    Regular,
    Symlink,
    /// commit of an embedded repository (submodule)
    Gitlink,
}

impl ObjectKind {
    /// decode the three leading octal digits of a git mode
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0o040 => Some(ObjectKind::Directory),
            0o100 => Some(ObjectKind::Regular),
            0o120 => Some(ObjectKind::Symlink),
            0o160 => Some(ObjectKind::Gitlink),
            _ => None,
        }
    }

    /// decode a full six-digit mode such as `0o100644`
    pub fn from_mode(mode: u32) -> Option<Self> {
        Self::from_code(mode >> 9)
    }

    pub fn code(&self) -> u32 {
        match self {
            ObjectKind::Directory => 0o040,
            ObjectKind::Regular => 0o100,
            ObjectKind::Symlink => 0o120,
            ObjectKind::Gitlink => 0o160,
        }
    }

    /// object type token git prints for this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Directory => "tree",
            ObjectKind::Regular | ObjectKind::Symlink => "blob",
            ObjectKind::Gitlink => "commit",
        }
    }
}

/// a named object inside a directory of the viewed revision
///
/// entries are immutable once parsed; they keep a handle to the
/// revision's object source so metadata such as the modification time can
/// be looked up on demand.
#[derive(Clone)]
pub struct TreeEntry {
    parent: String,
    name: String,
    kind: ObjectKind,
    perm: u32,
    id: ObjectId,
    size: u64,
    source: Rc<dyn ObjectSource>,
}

impl TreeEntry {
    pub fn new(
        parent: impl Into<String>,
        name: impl Into<String>,
        kind: ObjectKind,
        perm: u32,
        id: ObjectId,
        size: u64,
        source: Rc<dyn ObjectSource>,
    ) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
            kind,
            perm,
            id,
            size,
            source,
        }
    }

    /// synthetic entry for the root tree, which has no parent or name
    pub fn root(id: ObjectId, source: Rc<dyn ObjectSource>) -> Self {
        Self::new("", "", ObjectKind::Directory, 0, id, 0, source)
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// full path relative to the tree root
    pub fn path(&self) -> String {
        join_path(&self.parent, &self.name)
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// permission bits (low three octal digits of the mode)
    pub fn perm(&self) -> u32 {
        self.perm
    }

    /// unix-style mode: kind bits plus permission bits
    pub fn mode(&self) -> u32 {
        (self.kind.code() << 9) | self.perm
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// size in bytes; zero for anything but regular files
    pub fn size(&self) -> u64 {
        if self.kind == ObjectKind::Regular {
            self.size
        } else {
            0
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == ObjectKind::Directory
    }

    pub fn is_regular(&self) -> bool {
        self.kind == ObjectKind::Regular
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_empty() && self.name.is_empty()
    }

    /// author date of the last change to this path, or the epoch if git
    /// cannot tell us
    pub fn mod_time(&self) -> DateTime<FixedOffset> {
        let path = self.path();
        match self.source.last_modified(&path) {
            Ok(time) => time,
            Err(e) => {
                debug!(%path, error = %e, "modification time unavailable");
                DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
            }
        }
    }

    /// capability used to fetch this entry's content
    pub(crate) fn source(&self) -> &Rc<dyn ObjectSource> {
        &self.source
    }
}

impl fmt::Debug for TreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeEntry")
            .field("parent", &self.parent)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("perm", &format_args!("{:03o}", self.perm))
            .field("id", &self.id)
            .field("size", &self.size)
            .finish()
    }
}

impl PartialEq for TreeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent
            && self.name == other.name
            && self.kind == other.kind
            && self.perm == other.perm
            && self.id == other.id
            && self.size == other.size
    }
}

impl Eq for TreeEntry {}

/// join a directory path and a base name the way tree paths are written
pub fn join_path(parent: &str, name: &str) -> String {
    match (parent.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{}/{}", parent, name),
    }
}

/// normalize a directory path: drop trailing slashes, `.` means the root
pub fn normalize_path(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    if path == "." {
        ""
    } else {
        path
    }
}

/// split a normalized path into (parent, base name)
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}
