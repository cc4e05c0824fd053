//! Persisted command index for one repository namespace
//!
//! Layout of a namespace directory:
//!
//! | Entry | Contents |
//! |-------|----------|
//! | `index` | JSON array of commands |
//! | `lastUpdate` | epoch milliseconds of the last rebuild |
//! | `branch` | branch the index was built from |
//! | `cmds/` | rendered markdown, one file per command |
//!
//! Writes go to a sibling temp file that is renamed into place, so a reader
//! never sees a half-written index.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::command::Command;
use crate::error::{Error, Result};

const INDEX_FILE: &str = "index";
const LAST_UPDATE_FILE: &str = "lastUpdate";
const BRANCH_FILE: &str = "branch";
const MARKDOWN_DIR: &str = "cmds";

/// Handle on one namespace directory
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn markdown_dir(&self) -> PathBuf {
        self.root.join(MARKDOWN_DIR)
    }

    pub fn exists(&self) -> bool {
        self.index_path().is_file()
    }

    /// Read every command of the namespace
    pub fn read(&self) -> Result<Vec<Command>> {
        read_json(&self.index_path())
    }

    /// Like `read`, but a namespace without an index reads as empty
    pub fn read_or_empty(&self) -> Result<Vec<Command>> {
        match self.read() {
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            other => other,
        }
    }

    /// Replace the whole index
    pub fn write(&self, commands: &[Command]) -> Result<()> {
        self.write_encoded(&self.encode(commands)?)
    }

    /// Serialize `commands` without touching the disk
    pub fn encode(&self, commands: &[Command]) -> Result<Vec<u8>> {
        to_json(&self.index_path(), commands)
    }

    /// Replace the whole index with bytes from `encode`
    pub fn write_encoded(&self, bytes: &[u8]) -> Result<()> {
        write_atomic(&self.index_path(), bytes)
    }

    /// Epoch milliseconds of the last rebuild, `None` if never built
    pub fn last_update(&self) -> Result<Option<i64>> {
        optional(read_json(&self.root.join(LAST_UPDATE_FILE)))
    }

    pub fn set_last_update(&self, epoch_millis: i64) -> Result<()> {
        write_json(&self.root.join(LAST_UPDATE_FILE), &epoch_millis)
    }

    /// Branch the index was last built from
    pub fn branch(&self) -> Result<Option<String>> {
        optional(read_json(&self.root.join(BRANCH_FILE)))
    }

    pub fn set_branch(&self, branch: &str) -> Result<()> {
        write_json(&self.root.join(BRANCH_FILE), &branch)
    }

    /// True when the index was never built or is older than `interval_ms`
    pub fn is_stale(&self, now_millis: i64, interval_ms: u64) -> Result<bool> {
        Ok(match self.last_update()? {
            None => true,
            Some(last) => now_millis.saturating_sub(last) > interval_ms as i64,
        })
    }
}

fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::json(path, e))
}

fn to_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec(value).map_err(|e| Error::json(path, e))?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    write_atomic(path, &to_json(path, value)?)
}

/// Write `bytes` to a temp file next to `path`, then rename it over `path`
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
