use std::path::PathBuf;
use std::process::ExitStatus;

/// error type for gitree operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run {command}: {source}")]
    Invocation {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: {status}: {stderr:?}")]
    ExternalTool {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("could not parse line: {0:?}")]
    Parse(String),

    #[error("file name is not valid utf-8: {0:?}")]
    InvalidName(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("not a regular blob: {0}")]
    NotRegularFile(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// true when the path simply does not exist at the revision
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
