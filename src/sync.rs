//! Repository mirroring
//!
//! The index builder only needs a local directory tree reflecting one branch
//! of the source repository. `GitSync` produces it with the `git` CLI;
//! `LocalCheckout` uses a directory the user already has.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Supplies a local tree for `(url, branch)`
pub trait RepoSync {
    /// Make sure the tree is up to date and return its root
    fn sync(&self, url: &str, branch: &str) -> Result<PathBuf>;
}

/// Clone-if-absent, pull-and-checkout-if-present mirror using `git`
#[derive(Debug, Clone)]
pub struct GitSync {
    mirror: PathBuf,
}

impl GitSync {
    /// A relative `mirror` is resolved against the current directory
    pub fn new(mirror: impl Into<PathBuf>) -> Self {
        let mirror = mirror.into();
        let mirror = match std::env::current_dir() {
            Ok(cwd) if mirror.is_relative() => cwd.join(mirror),
            _ => mirror,
        };
        Self { mirror }
    }

    pub fn mirror(&self) -> &Path {
        &self.mirror
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        let command = format!("git {}", args.join(" "));
        debug!(%command, "running git");

        // Progress output goes straight to the terminal
        let status = Command::new("git")
            .args(args)
            .status()
            .map_err(|e| Error::Sync {
                command: command.clone(),
                status: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Sync {
                command,
                status: status.to_string(),
            })
        }
    }
}

impl RepoSync for GitSync {
    fn sync(&self, url: &str, branch: &str) -> Result<PathBuf> {
        let mirror = path_str(&self.mirror);

        if self.mirror.exists() {
            self.git(&["-C", &mirror, "pull"])?;
        } else {
            if let Some(parent) = self.mirror.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            self.git(&["clone", "-b", branch, url, &mirror])?;
        }
        self.git(&["-C", &mirror, "checkout", branch])?;

        Ok(self.mirror.clone())
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// An existing checkout, used as-is
#[derive(Debug, Clone)]
pub struct LocalCheckout {
    root: PathBuf,
}

impl LocalCheckout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RepoSync for LocalCheckout {
    fn sync(&self, _url: &str, _branch: &str) -> Result<PathBuf> {
        if self.root.is_dir() {
            Ok(self.root.clone())
        } else {
            Err(Error::io(
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_checkout_returns_root() {
        let dir = TempDir::new().unwrap();
        let sync = LocalCheckout::new(dir.path());
        let root = sync.sync("https://example.com/a/b", "main").unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_local_checkout_missing_dir() {
        let dir = TempDir::new().unwrap();
        let sync = LocalCheckout::new(dir.path().join("missing"));
        let err = sync.sync("https://example.com/a/b", "main").unwrap_err();
        assert!(err.is_not_found());
    }

    /// Run git in `dir` with a throwaway identity; false when git is unusable
    fn git_in(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(["-c", "user.name=cwc", "-c", "user.email=cwc@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(dir)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_relative_mirror_is_resolved_against_cwd() {
        let sync = GitSync::new("home/repos/o/n");
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(sync.mirror(), cwd.join("home/repos/o/n"));

        let dir = TempDir::new().unwrap();
        assert_eq!(GitSync::new(dir.path()).mirror(), dir.path());
    }

    #[test]
    fn test_clone_then_pull_into_relative_mirror() {
        // Relative to the test's working directory
        let work = tempfile::Builder::new()
            .prefix(".git-sync-")
            .tempdir_in(".")
            .unwrap();
        let origin = std::fs::canonicalize(work.path()).unwrap().join("origin");
        std::fs::create_dir_all(&origin).unwrap();
        std::fs::write(origin.join("first.md"), "### First\n").unwrap();
        let ready = git_in(&origin, &["init", "-q"])
            && git_in(&origin, &["add", "."])
            && git_in(&origin, &["commit", "-q", "-m", "first"])
            && git_in(&origin, &["branch", "-M", "master"]);
        if !ready {
            eprintln!("git not available, skipping");
            return;
        }

        let relative = work.path().join("home/repos/o/n");
        assert!(relative.is_relative());
        let sync = GitSync::new(&relative);
        let url = origin.to_string_lossy().into_owned();

        let root = sync.sync(&url, "master").unwrap();
        assert!(root.is_absolute());
        assert!(root.join("first.md").is_file());

        // Second sync takes the pull path
        std::fs::write(origin.join("second.md"), "### Second\n").unwrap();
        assert!(git_in(&origin, &["add", "."]));
        assert!(git_in(&origin, &["commit", "-q", "-m", "second"]));
        let again = sync.sync(&url, "master").unwrap();
        assert_eq!(again, root);
        assert!(root.join("second.md").is_file());
    }

    #[test]
    fn test_git_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // Existing directory that is not a repository: `git pull` must fail
        std::fs::create_dir_all(dir.path().join("mirror")).unwrap();
        let sync = GitSync::new(dir.path().join("mirror"));
        match sync.sync("https://example.invalid/a/b", "main") {
            Err(Error::Sync { command, .. }) => assert!(command.starts_with("git")),
            other => panic!("expected sync error, got {:?}", other),
        }
    }
}
