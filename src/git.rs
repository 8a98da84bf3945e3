//! running git subcommands and capturing their output

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};

/// anything that can run a git subcommand and hand back its stdout
///
/// the tree adapter only talks to git through this trait, so tests and
/// alternative backends can substitute canned output.
pub trait GitInvoker {
    fn invoke(&self, args: &[&str]) -> Result<Output>;
}

/// runs the git executable as a child process, one process per call
#[derive(Clone, Debug)]
pub struct GitCommand {
    binary: String,
    git_dir: Option<PathBuf>,
}

impl GitCommand {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            git_dir: None,
        }
    }

    /// pass `--git-dir=<dir>` ahead of every subcommand
    pub fn with_git_dir(mut self, git_dir: impl Into<PathBuf>) -> Self {
        self.git_dir = Some(git_dir.into());
        self
    }

    pub fn git_dir(&self) -> Option<&Path> {
        self.git_dir.as_deref()
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.binary.clone();
        if let Some(dir) = &self.git_dir {
            command.push_str(&format!(" --git-dir={}", dir.display()));
        }
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitInvoker for GitCommand {
    fn invoke(&self, args: &[&str]) -> Result<Output> {
        let command = self.describe(args);
        debug!(%command, "running git");

        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = &self.git_dir {
            let mut flag = OsString::from("--git-dir=");
            flag.push(dir);
            cmd.arg(flag);
        }
        cmd.args(args).stdin(Stdio::null());

        let output = match cmd.output() {
            Ok(output) => output,
            Err(source) => return Err(Error::Invocation { command, source }),
        };

        if !output.status.success() {
            return Err(Error::ExternalTool {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(Output::new(output.stdout))
    }
}

/// captured stdout of a git subcommand, read front to back
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    data: Vec<u8>,
    pos: usize,
}

impl Output {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// next record up to (not including) `delim`; the last record may lack one
    pub fn read_until(&mut self, delim: u8) -> Option<&[u8]> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let (record, consumed) = match rest.iter().position(|&b| b == delim) {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        Some(record)
    }

    /// next line as text, without its newline
    pub fn first_line(&mut self) -> Result<String> {
        let line = self
            .read_until(b'\n')
            .ok_or_else(|| Error::Parse(String::new()))?;
        let line = String::from_utf8_lossy(line).trim_end_matches('\r').to_string();
        if line.is_empty() {
            return Err(Error::Parse(line));
        }
        Ok(line)
    }

    /// remaining bytes split on `delim`
    pub fn split(&self, delim: u8) -> impl Iterator<Item = &[u8]> {
        self.remaining().split(move |&b| b == delim)
    }

    /// bytes not yet consumed
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.drain(..self.pos);
        self.data
    }
}

/// ask git where the repository of the current working directory lives
pub fn discover_git_dir(git: &dyn GitInvoker) -> Result<PathBuf> {
    let mut out = git.invoke(&["rev-parse", "--git-dir"])?;
    Ok(PathBuf::from(out.first_line()?))
}
