use serde::Serialize;

use crate::error::Result;
use crate::fs::{FileInfo, FileSystem};
use crate::hash::ObjectId;
use crate::types::ObjectKind;

/// list tree entry with full path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LsTreeEntry {
    pub path: String,
    pub mode: u32,
    #[serde(rename = "type")]
    pub object_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub size: u64,
}

impl LsTreeEntry {
    pub fn from_info(info: &impl FileInfo) -> Self {
        let object_type = match info.kind() {
            Some(kind) => kind.type_name(),
            None if info.is_dir() => ObjectKind::Directory.type_name(),
            None => ObjectKind::Regular.type_name(),
        };
        Self {
            path: info.path(),
            mode: info.mode(),
            object_type,
            id: info.object_id(),
            size: info.size(),
        }
    }

    fn is_regular(&self) -> bool {
        ObjectKind::from_mode(self.mode) == Some(ObjectKind::Regular)
    }

    /// `ls-tree -l` style line, with the size column
    pub fn long(&self) -> String {
        let size = if self.is_regular() {
            self.size.to_string()
        } else {
            "-".to_string()
        };
        format!(
            "{:06o} {} {} {:>7}\t{}",
            self.mode,
            self.object_type,
            self.id_hex(),
            size,
            self.path
        )
    }

    fn id_hex(&self) -> String {
        match &self.id {
            Some(id) => id.to_hex(),
            None => "-".repeat(40),
        }
    }
}

/// list `path` through any filesystem, optionally descending into
/// sub-directories (pre-order, names sorted within each directory)
///
/// a path naming a file lists just that file. submodules are listed but
/// never entered.
pub fn ls_tree<F: FileSystem>(fs: &F, path: &str, recursive: bool) -> Result<Vec<LsTreeEntry>> {
    let info = fs.stat(path)?;
    if !info.is_dir() {
        return Ok(vec![LsTreeEntry::from_info(&info)]);
    }

    let mut entries = Vec::new();
    ls_tree_impl(fs, &info.path(), recursive, &mut entries)?;
    Ok(entries)
}

fn ls_tree_impl<F: FileSystem>(
    fs: &F,
    dir: &str,
    recursive: bool,
    entries: &mut Vec<LsTreeEntry>,
) -> Result<()> {
    for info in fs.read_dir(dir)? {
        entries.push(LsTreeEntry::from_info(&info));

        if recursive && info.is_dir() {
            ls_tree_impl(fs, &info.path(), recursive, entries)?;
        }
    }

    Ok(())
}

impl std::fmt::Display for LsTreeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:06o} {} {}\t{}",
            self.mode,
            self.object_type,
            self.id_hex(),
            self.path
        )
    }
}
