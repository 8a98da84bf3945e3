use chrono::{DateTime, FixedOffset};

use crate::error::{Error, Result};
use crate::git::GitInvoker;
use crate::hash::ObjectId;

/// resolve `revision` to the id of its root tree
pub fn resolve_root_tree(git: &dyn GitInvoker, revision: &str) -> Result<ObjectId> {
    let spec = format!("{}^{{tree}}", revision);
    let mut output = git.invoke(&["rev-parse", &spec])?;
    ObjectId::from_hex(&output.first_line()?)
}

/// author date of the most recent commit reachable from `revision` that
/// touched `path` (any commit when `path` is the root)
///
/// scoped to `revision` and `path` on purpose: a bare `log -1` would report
/// the newest commit on the checked-out branch for every entry.
pub fn last_author_date(
    git: &dyn GitInvoker,
    revision: &str,
    path: &str,
) -> Result<DateTime<FixedOffset>> {
    let mut args = vec!["log", "-1", "--pretty=format:%aD", revision];
    if !path.is_empty() {
        args.push("--");
        args.push(path);
    }
    let mut output = git.invoke(&args)?;
    let date = output.first_line()?;
    DateTime::parse_from_rfc2822(&date).map_err(|_| Error::Parse(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGit;

    const TREE_ID: &str = "d564d0bc3dd917926892c55e3706cc116d5b165e";

    #[test]
    fn test_resolve_root_tree() {
        let git = ScriptedGit::new().respond(
            &["rev-parse", "v2^{tree}"],
            format!("{}\n", TREE_ID),
        );
        let id = resolve_root_tree(&git, "v2").unwrap();
        assert_eq!(id.to_hex(), TREE_ID);
    }

    #[test]
    fn test_resolve_root_tree_garbage() {
        let git = ScriptedGit::new().respond(&["rev-parse", "HEAD^{tree}"], "HEAD^{tree}\n");
        assert!(matches!(
            resolve_root_tree(&git, "HEAD"),
            Err(Error::InvalidObjectId(_))
        ));
    }

    #[test]
    fn test_last_author_date() {
        let git = ScriptedGit::new().respond(
            &["log", "-1", "--pretty=format:%aD", "HEAD", "--", "src/lib.rs"],
            "Tue, 3 Mar 2015 10:21:07 +0100",
        );
        let date = last_author_date(&git, "HEAD", "src/lib.rs").unwrap();
        assert_eq!(date.timestamp(), 1425374467);
        assert_eq!(date.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_last_author_date_root_has_no_pathspec() {
        let git = ScriptedGit::new().respond(
            &["log", "-1", "--pretty=format:%aD", "HEAD"],
            "Thu, 1 Jan 1970 00:00:10 +0000",
        );
        assert_eq!(last_author_date(&git, "HEAD", "").unwrap().timestamp(), 10);
    }

    #[test]
    fn test_last_author_date_unparsable() {
        let git = ScriptedGit::new().respond(
            &["log", "-1", "--pretty=format:%aD", "HEAD", "--", "x"],
            "yesterday-ish",
        );
        assert!(matches!(
            last_author_date(&git, "HEAD", "x"),
            Err(Error::Parse(_))
        ));
    }
}
