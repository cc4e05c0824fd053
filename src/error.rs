//! Error type shared by the index, builder and execution layers

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{command}' failed ({status})")]
    Sync { command: String, status: String },

    #[error("invalid config at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("repository name not found in repository url '{0}'")]
    RepoUrl(String),

    #[error("no config directory available; set CWC_HOME")]
    NoHome,

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl Error {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying cause is a missing file
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
