use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, Result};

/// revision used when none is configured
pub const DEFAULT_REVISION: &str = "HEAD";

fn default_git_binary() -> String {
    "git".to_string()
}

/// settings for opening a repository view, optionally stored as toml
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// revision to expose; `HEAD` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// git directory; discovered from the working directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_dir: Option<PathBuf>,
    /// git executable to run
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

impl Config {
    /// load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn with_git_dir(mut self, git_dir: impl Into<PathBuf>) -> Self {
        self.git_dir = Some(git_dir.into());
        self
    }

    /// effective revision, falling back to `HEAD`
    pub fn revision(&self) -> &str {
        match self.revision.as_deref() {
            Some(rev) if !rev.is_empty() => rev,
            _ => DEFAULT_REVISION,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            revision: None,
            git_dir: None,
            git_binary: default_git_binary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gitree.toml");

        let config = Config::default()
            .with_revision("v1.2.0")
            .with_git_dir("/srv/project/.git");
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.git_binary, "git");
        assert_eq!(config.revision(), "HEAD");
    }

    #[test]
    fn test_empty_revision_falls_back_to_head() {
        let config: Config = toml::from_str("revision = \"\"").unwrap();
        assert_eq!(config.revision(), "HEAD");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(crate::Error::Io { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "revision = [").unwrap();
        assert!(matches!(Config::load(&path), Err(crate::Error::Config(_))));
    }
}
