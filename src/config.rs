//! Configuration file support for cwc
//!
//! Reads from `<home>/config.toml`, where home is `$CWC_HOME` or
//! `<user config dir>/commands-wiki`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "CWC_HOME";

const DEFAULT_REPO: &str = "https://github.com/lerndmina/commands-wiki";

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Repository holding the command documents
    #[serde(default = "default_repo")]
    pub repo: String,

    /// Branch used when the index does not track one yet
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Maximum index age before a search triggers a rebuild (24h by default)
    #[serde(default = "default_update_interval")]
    pub update_interval_ms: u64,

    /// Directory inside the repository holding the documents
    #[serde(default = "default_commands_path")]
    pub commands_path: String,

    /// Shell used to run rendered scripts
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_repo() -> String {
    DEFAULT_REPO.to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_update_interval() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_commands_path() -> String {
    "src/content/docs/commands".to_string()
}

fn default_shell() -> String {
    "bash".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            branch: default_branch(),
            update_interval_ms: default_update_interval(),
            commands_path: default_commands_path(),
            shell: default_shell(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the home directory
    /// Returns the default config if the file doesn't exist
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join("config.toml");
        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| Error::Config {
                path,
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::io(path, e)),
        }
    }
}

/// Resolve the home directory holding config, mirrors and indexes
///
/// A relative `$CWC_HOME` is taken relative to the current directory.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        let home = PathBuf::from(home);
        if home.is_relative() {
            let cwd = std::env::current_dir().map_err(|e| Error::io(&home, e))?;
            return Ok(cwd.join(home));
        }
        return Ok(home);
    }
    dirs::config_dir()
        .map(|dir| dir.join("commands-wiki"))
        .ok_or(Error::NoHome)
}

/// Identity of a source repository, used to namespace mirrors and indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Take the last two path segments of a repository URL
    /// e.g. "https://github.com/lerndmina/commands-wiki.git" -> lerndmina/commands-wiki
    pub fn from_url(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let mut segments = trimmed.rsplit(['/', ':']).filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (Some(name), Some(owner)) => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(Error::RepoUrl(url.to_string())),
        }
    }

    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.owner).join(&self.name)
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Mirror of a repository: `<home>/repos/<owner>/<name>`
pub fn repo_dir(home: &Path, repo: &RepoId) -> PathBuf {
    home.join("repos").join(repo.relative_path())
}

/// Index namespace of a repository: `<home>/index/<owner>/<name>`
pub fn index_dir(home: &Path, repo: &RepoId) -> PathBuf {
    home.join("index").join(repo.relative_path())
}

/// Saved ad-hoc documents: `<home>/ai`
pub fn adhoc_dir(home: &Path) -> PathBuf {
    home.join("ai")
}

/// Remove everything cwc stored under the home directory
pub fn clean(home: &Path) -> Result<()> {
    match std::fs::remove_dir_all(home) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(home, e)),
    }
}
