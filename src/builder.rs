//! Index rebuilds and ad-hoc document merges
//!
//! A rebuild is all-or-nothing: every document is parsed and every markdown
//! body rendered into a staging directory before anything visible changes.
//! Only then is the markdown cache swapped and the index rewritten; if the
//! index write fails the previous cache is moved back.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::command::Command;
use crate::config::{self, Config, RepoId};
use crate::error::{Error, Result};
use crate::index::IndexStore;
use crate::parser::{self, ParsedCommand};
use crate::sync::RepoSync;

const STAGING_DIR: &str = "cmds.staging";
const BACKUP_DIR: &str = "cmds.old";

/// Summary of a finished rebuild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub documents: usize,
    pub commands: usize,
    pub branch: String,
}

/// Drives sync, parsing and the index store for one namespace
pub struct IndexBuilder<'a> {
    home: PathBuf,
    config: &'a Config,
    store: IndexStore,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(home: impl Into<PathBuf>, config: &'a Config, repo: &RepoId) -> Self {
        let home = home.into();
        let store = IndexStore::new(config::index_dir(&home, repo));
        Self {
            home,
            config,
            store,
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Sync the repository and replace the namespace index
    pub fn rebuild(&self, sync: &dyn RepoSync, url: &str, branch: &str) -> Result<BuildReport> {
        info!(repo = url, branch, "rebuilding index");
        let root = sync.sync(url, branch)?;

        let mut documents = markdown_files(&root.join(&self.config.commands_path))?
            .into_iter()
            .map(|path| (path, false))
            .collect::<Vec<_>>();
        let adhoc = config::adhoc_dir(&self.home);
        if adhoc.is_dir() {
            documents.extend(markdown_files(&adhoc)?.into_iter().map(|path| (path, true)));
        }

        let mut parsed = Vec::new();
        for (path, ai_generated) in &documents {
            let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            let commands = parser::parse_document(&contents, *ai_generated);
            debug!(file = %path.display(), commands = commands.len(), "parsed document");
            parsed.extend(commands);
        }

        let staging = self.store.root().join(STAGING_DIR);
        let cache = self.store.markdown_dir();
        remove_dir_if_exists(&staging)?;
        let commands = render_markdown(parsed, &staging, &cache, &mut HashSet::new())?;
        let encoded = self.store.encode(&commands)?;

        self.swap_cache(&staging, || self.store.write_encoded(&encoded))?;
        self.store.set_last_update(chrono::Utc::now().timestamp_millis())?;
        self.store.set_branch(branch)?;

        info!(documents = documents.len(), commands = commands.len(), "index rebuilt");
        Ok(BuildReport {
            documents: documents.len(),
            commands: commands.len(),
            branch: branch.to_string(),
        })
    }

    /// Move `staging` into place as the markdown cache, then run `commit`
    ///
    /// The previous cache is parked in a backup directory until `commit`
    /// succeeds and is restored if it fails.
    fn swap_cache(&self, staging: &Path, commit: impl FnOnce() -> Result<()>) -> Result<()> {
        let cache = self.store.markdown_dir();
        let backup = self.store.root().join(BACKUP_DIR);

        // A backup without a cache is left over from an interrupted swap
        if backup.exists() && !cache.exists() {
            fs::rename(&backup, &cache).map_err(|e| Error::io(&cache, e))?;
        }
        remove_dir_if_exists(&backup)?;

        let had_cache = cache.exists();
        if had_cache {
            fs::rename(&cache, &backup).map_err(|e| Error::io(&backup, e))?;
        }
        let swapped = fs::rename(staging, &cache)
            .map_err(|e| Error::io(&cache, e))
            .and_then(|()| commit());

        if let Err(e) = swapped {
            warn!(error = %e, "index not written, restoring markdown cache");
            if let Err(restore) = self.restore_cache(&backup, had_cache) {
                warn!(error = %restore, "markdown cache not restored");
            }
            return Err(e);
        }
        remove_dir_if_exists(&backup)
    }

    fn restore_cache(&self, backup: &Path, had_cache: bool) -> Result<()> {
        let cache = self.store.markdown_dir();
        remove_dir_if_exists(&cache)?;
        if had_cache {
            fs::rename(backup, &cache).map_err(|e| Error::io(&cache, e))?;
        }
        Ok(())
    }

    /// Save a generated document and append its commands to the index
    ///
    /// The index is rewritten whole with the new commands at the end; the
    /// last-update stamp is left alone.
    pub fn merge_document(&self, markdown: &str) -> Result<Vec<Command>> {
        let parsed = parser::parse_document(markdown, true);
        let label = parsed
            .first()
            .map(|p| slug(&p.command.title))
            .unwrap_or_else(|| "document".to_string());

        // An unreadable index fails the merge before anything is saved
        let mut commands = self.store.read_or_empty()?;

        let adhoc = config::adhoc_dir(&self.home);
        fs::create_dir_all(&adhoc).map_err(|e| Error::io(&adhoc, e))?;
        let saved = adhoc.join(format!("ai-{}-{}.md", uuid::Uuid::new_v4(), label));
        fs::write(&saved, markdown).map_err(|e| Error::io(&saved, e))?;

        let cache = self.store.markdown_dir();
        let mut taken = existing_names(&cache)?;
        let added = render_markdown(parsed, &cache, &cache, &mut taken)?;

        commands.extend(added.iter().cloned());
        self.store.write(&commands)?;

        info!(file = %saved.display(), commands = added.len(), "merged document");
        Ok(added)
    }

    /// Branch to rebuild from: the one the index was built from, else the configured one
    pub fn tracked_branch(&self) -> Result<String> {
        Ok(self
            .store
            .branch()?
            .unwrap_or_else(|| self.config.branch.clone()))
    }

    /// Read the index for a search, building or refreshing it first
    ///
    /// A missing index must build. A stale one is rebuilt on a best-effort
    /// basis: on failure the old index is used.
    pub fn load_for_search(
        &self,
        sync: &dyn RepoSync,
        url: &str,
        now_millis: i64,
    ) -> Result<Vec<Command>> {
        let branch = self.tracked_branch()?;
        if !self.store.exists() {
            info!("no index yet, building it");
            self.rebuild(sync, url, &branch)?;
        } else if self
            .store
            .is_stale(now_millis, self.config.update_interval_ms)?
        {
            if let Err(e) = self.rebuild(sync, url, &branch) {
                warn!(error = %e, "failed to update the index, using the existing one");
            }
        }
        self.store.read()
    }
}

/// Every `.md` file below `dir`, sorted by path
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        let is_md = entry
            .path()
            .extension()
            .map(|ext| ext == "md")
            .unwrap_or(false);
        if entry.file_type().is_file() && is_md {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Write each body to `write_dir` and point the command at `final_dir`
fn render_markdown(
    parsed: Vec<ParsedCommand>,
    write_dir: &Path,
    final_dir: &Path,
    taken: &mut HashSet<String>,
) -> Result<Vec<Command>> {
    fs::create_dir_all(write_dir).map_err(|e| Error::io(write_dir, e))?;

    let mut commands = Vec::with_capacity(parsed.len());
    for ParsedCommand { mut command, markdown } in parsed {
        let name = unique_name(&slug(&command.title), taken);
        let path = write_dir.join(&name);
        fs::write(&path, markdown).map_err(|e| Error::io(&path, e))?;
        command.markdown_file = final_dir.join(&name);
        commands.push(command);
    }
    Ok(commands)
}

fn existing_names(dir: &Path) -> Result<HashSet<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(Error::io(dir, e)),
    };
    Ok(entries
        .flatten()
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect())
}

/// File-system safe version of a title
pub fn slug(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "command".to_string()
    } else {
        cleaned
    }
}

/// `<slug>.md`, or `<slug>-2.md`, `<slug>-3.md`... when already used
fn unique_name(slug: &str, taken: &mut HashSet<String>) -> String {
    let mut name = format!("{}.md", slug);
    let mut n = 2;
    while taken.contains(&name) {
        name = format!("{}-{}.md", slug, n);
        n += 1;
    }
    taken.insert(name.clone());
    name
}

fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(dir, e)),
    }
}
