use std::rc::Rc;

use chrono::{DateTime, FixedOffset};

use crate::hash::ObjectId;
use crate::types::{ObjectKind, TreeEntry};

/// metadata a filesystem reports for one path
pub trait FileInfo {
    /// base name; empty for the root
    fn name(&self) -> &str;

    /// full path from the root
    fn path(&self) -> String;

    fn is_dir(&self) -> bool;

    /// unix-style mode: type bits plus permission bits
    fn mode(&self) -> u32;

    /// size in bytes, meaningful for regular files only
    fn size(&self) -> u64;

    fn mod_time(&self) -> DateTime<FixedOffset>;

    /// content id, for backends that have one
    fn object_id(&self) -> Option<ObjectId> {
        None
    }

    fn kind(&self) -> Option<ObjectKind> {
        ObjectKind::from_mode(self.mode())
    }
}

impl FileInfo for TreeEntry {
    fn name(&self) -> &str {
        TreeEntry::name(self)
    }

    fn path(&self) -> String {
        TreeEntry::path(self)
    }

    fn is_dir(&self) -> bool {
        TreeEntry::is_dir(self)
    }

    fn mode(&self) -> u32 {
        TreeEntry::mode(self)
    }

    fn size(&self) -> u64 {
        TreeEntry::size(self)
    }

    fn mod_time(&self) -> DateTime<FixedOffset> {
        TreeEntry::mod_time(self)
    }

    fn object_id(&self) -> Option<ObjectId> {
        Some(self.id())
    }

    fn kind(&self) -> Option<ObjectKind> {
        Some(TreeEntry::kind(self))
    }
}

impl<T: FileInfo + ?Sized> FileInfo for Rc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn path(&self) -> String {
        (**self).path()
    }

    fn is_dir(&self) -> bool {
        (**self).is_dir()
    }

    fn mode(&self) -> u32 {
        (**self).mode()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }

    fn mod_time(&self) -> DateTime<FixedOffset> {
        (**self).mod_time()
    }

    fn object_id(&self) -> Option<ObjectId> {
        (**self).object_id()
    }

    fn kind(&self) -> Option<ObjectKind> {
        (**self).kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::NullSource;

    #[test]
    fn test_tree_entry_info() {
        let entry = Rc::new(TreeEntry::new(
            "bin",
            "run.sh",
            ObjectKind::Regular,
            0o755,
            ObjectId::ZERO,
            64,
            NullSource::rc(),
        ));

        fn describe(info: &impl FileInfo) -> (String, u32, u64, bool) {
            (info.path(), info.mode(), info.size(), info.is_dir())
        }

        assert_eq!(describe(&entry), ("bin/run.sh".to_string(), 0o100755, 64, false));
        assert_eq!(FileInfo::name(&entry), "run.sh");
        assert_eq!(FileInfo::kind(&entry), Some(ObjectKind::Regular));
        assert_eq!(entry.object_id(), Some(ObjectId::ZERO));
        assert_eq!(FileInfo::mod_time(&entry).timestamp(), 0);
    }
}
