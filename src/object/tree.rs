use std::rc::Rc;
use std::sync::OnceLock;

use regex::bytes::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::git::{GitInvoker, Output};
use crate::hash::ObjectId;
use crate::object::ObjectSource;
use crate::types::{Listing, ObjectKind, TreeEntry};

// example `ls-tree -l` records (NUL separated with -z):
//   040000 tree d564d0bc3dd917926892c55e3706cc116d5b165e       -	directory
//   100755 blob e69de29bb2d1d6434b8b29ae775ad8c2e48c5391       0	executable
//   100644 blob 78981922613b2afb6025042ff6bd878ac1994e85    1234	file
//   160000 commit 5499f342043544dcc4c437c0eb10b4d721f30dd3       -	submodule
//   120000 blob 8d14cbf983b3fad683171c9418998d9f68340823      11	symlink
fn record_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s-u)^([0-7]{6}) +([a-z]+) +([0-9a-f]{40}) +([0-9]+|-)\t(.+)$")
            .expect("ls-tree record pattern is valid")
    })
}

/// one decoded `ls-tree` record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub kind: ObjectKind,
    pub perm: u32,
    pub id: ObjectId,
    pub size: u64,
    pub name: String,
}

fn malformed(line: &[u8]) -> Error {
    Error::Parse(String::from_utf8_lossy(line).into_owned())
}

/// decode a single `<mode> <type> <hash> <size>\t<name>` record
///
/// git emits names as raw bytes; a well-formed record whose name is not
/// utf-8 is reported as `InvalidName` rather than `Parse`.
pub fn parse_record(line: &[u8]) -> Result<Record> {
    let caps = record_pattern()
        .captures(line)
        .ok_or_else(|| malformed(line))?;

    // everything but the name is ascii by construction of the pattern
    let field = |i: usize| std::str::from_utf8(&caps[i]).map_err(|_| malformed(line));

    let mode = field(1)?;
    let code = u32::from_str_radix(&mode[..3], 8).map_err(|_| malformed(line))?;
    let perm = u32::from_str_radix(&mode[3..], 8).map_err(|_| malformed(line))?;
    let kind = ObjectKind::from_code(code).ok_or_else(|| malformed(line))?;

    let id = ObjectId::from_hex(field(3)?)?;

    // a size that does not fit is recorded as zero rather than failing the listing
    let size = match field(4)? {
        "-" => 0,
        digits => digits.parse().unwrap_or_else(|_| {
            debug!(size = digits, "unparsable size in ls-tree output");
            0
        }),
    };

    let name = String::from_utf8(caps[5].to_vec())
        .map_err(|e| Error::InvalidName(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;

    Ok(Record {
        kind,
        perm,
        id,
        size,
        name,
    })
}

/// parse the NUL-delimited output of `ls-tree -z -l` for directory `parent`
///
/// any malformed record fails the whole listing. entries whose name is not
/// utf-8 are left out of the listing and logged.
pub fn parse_listing(output: &Output, parent: &str, source: &Rc<dyn ObjectSource>) -> Result<Listing> {
    let mut listing = Listing::new();

    for raw in output.split(0) {
        if raw.is_empty() {
            continue;
        }
        let record = match parse_record(raw) {
            Ok(record) => record,
            Err(Error::InvalidName(name)) => {
                warn!(parent, %name, "skipping entry with non-utf-8 name");
                continue;
            }
            Err(e) => return Err(e),
        };

        let entry = TreeEntry::new(
            parent,
            record.name.clone(),
            record.kind,
            record.perm,
            record.id,
            record.size,
            Rc::clone(source),
        );
        listing.insert(record.name, Rc::new(entry));
    }

    Ok(listing)
}

/// list directory `path` of `revision` (one level, no recursion)
pub fn read_tree(
    git: &dyn GitInvoker,
    revision: &str,
    path: &str,
    source: &Rc<dyn ObjectSource>,
) -> Result<Listing> {
    let spec = format!("{}:{}", revision, path);
    let output = git.invoke(&["ls-tree", "--full-tree", "-z", "-l", &spec])?;
    parse_listing(&output, path, source)
}
