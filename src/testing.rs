//! test doubles for the git seam

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset};

use crate::error::{Error, Result};
use crate::git::{GitInvoker, Output};
use crate::hash::ObjectId;
use crate::object::ObjectSource;

/// invoker that answers from a script and records every call
///
/// unscripted commands fail the way git does for an unknown object.
#[derive(Default)]
pub struct ScriptedGit {
    responses: HashMap<String, std::result::Result<Vec<u8>, String>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, args: &[&str], stdout: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(args.join(" "), Ok(stdout.into()));
        self
    }

    pub fn fail(mut self, args: &[&str], stderr: &str) -> Self {
        self.responses.insert(args.join(" "), Err(stderr.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// how often exactly this command line was run
    pub fn count(&self, args: &[&str]) -> usize {
        let line = args.join(" ");
        self.calls.borrow().iter().filter(|c| **c == line).count()
    }
}

impl GitInvoker for ScriptedGit {
    fn invoke(&self, args: &[&str]) -> Result<Output> {
        let line = args.join(" ");
        self.calls.borrow_mut().push(line.clone());

        let stderr = match self.responses.get(&line) {
            Some(Ok(stdout)) => return Ok(Output::new(stdout.clone())),
            Some(Err(stderr)) => stderr.clone(),
            None => format!("fatal: not scripted: {}\n", line),
        };
        Err(Error::ExternalTool {
            command: format!("git {}", line),
            status: ExitStatus::from_raw(128 << 8),
            stderr,
        })
    }
}

/// object source with nothing in it
pub struct NullSource;

impl NullSource {
    pub fn rc() -> Rc<dyn ObjectSource> {
        Rc::new(NullSource)
    }
}

impl ObjectSource for NullSource {
    fn read_blob(&self, id: &ObjectId) -> Result<Vec<u8>> {
        Err(Error::NotFound(id.to_hex()))
    }

    fn last_modified(&self, path: &str) -> Result<DateTime<FixedOffset>> {
        Err(Error::NotFound(path.to_string()))
    }
}

/// author date stamped on every commit of [`GitFixture`]
pub const FIXTURE_DATE: &str = "Tue, 3 Mar 2015 10:21:07 +0100";

/// throwaway on-disk repository with one commit:
///
/// ```text
/// README.md         "hello, tree\n"
/// bin/run.sh        mode 755
/// docs/guide/intro.md
/// latest -> README.md
/// ```
pub struct GitFixture {
    pub dir: tempfile::TempDir,
}

impl GitFixture {
    /// None when no usable git is installed
    pub fn create() -> Option<Self> {
        use std::os::unix::fs::{symlink, PermissionsExt};

        let available = std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !available {
            return None;
        }

        let dir = tempfile::tempdir().unwrap();
        let work = dir.path();
        std::fs::write(work.join("README.md"), "hello, tree\n").unwrap();
        std::fs::create_dir_all(work.join("bin")).unwrap();
        std::fs::write(work.join("bin/run.sh"), "#!/bin/sh\necho hi\n").unwrap();
        std::fs::set_permissions(
            work.join("bin/run.sh"),
            std::fs::Permissions::from_mode(0o755),
        )
        .unwrap();
        std::fs::create_dir_all(work.join("docs/guide")).unwrap();
        std::fs::write(work.join("docs/guide/intro.md"), "# intro\n").unwrap();
        symlink("README.md", work.join("latest")).unwrap();

        let fixture = Self { dir };
        fixture.git(&["init", "-q"]);
        fixture.git(&["add", "-A"]);
        fixture.git(&["commit", "-q", "-m", "initial"]);
        Some(fixture)
    }

    pub fn git_dir(&self) -> std::path::PathBuf {
        self.dir.path().join(".git")
    }

    /// run git in the work tree with a fixed identity and date
    pub fn git(&self, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .current_dir(self.dir.path())
            .args([
                "-c",
                "user.name=Fixture",
                "-c",
                "user.email=fixture@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "core.filemode=true",
            ])
            .args(args)
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .env("GIT_AUTHOR_DATE", FIXTURE_DATE)
            .env("GIT_COMMITTER_DATE", FIXTURE_DATE)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }
}
