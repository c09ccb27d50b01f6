//! All well-known paths under `.gitcontext/`. Pure computation, no I/O
//! except where noted.

use gitctx_core::{ContextError, Result, DEFAULT_BRANCH};
use std::path::{Path, PathBuf};

/// Name of the repository marker directory.
pub const CONTEXT_DIR: &str = ".gitcontext";

#[derive(Debug, Clone)]
pub struct RepoPaths {
    pub root: PathBuf,
    pub context_dir: PathBuf,
    pub index_file: PathBuf,
    pub temp_dir: PathBuf,
    pub contexts_dir: PathBuf,
    pub branches_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub lock_file: PathBuf,
}

impl RepoPaths {
    /// Derive all paths from a repo root, with the default directory name.
    pub fn discover(repo_root: impl Into<PathBuf>) -> Self {
        Self::with_dir_name(repo_root, CONTEXT_DIR)
    }

    /// Derive all paths with a custom marker directory name (config override).
    pub fn with_dir_name(repo_root: impl Into<PathBuf>, dir_name: &str) -> Self {
        let root = repo_root.into();
        let context_dir = root.join(dir_name);
        let contexts_dir = context_dir.join("contexts");
        Self {
            index_file: context_dir.join("index.yaml"),
            temp_dir: context_dir.join("temp"),
            branches_dir: contexts_dir.join("branches"),
            archive_dir: context_dir.join("archive"),
            lock_file: context_dir.join("LOCK"),
            contexts_dir,
            context_dir,
            root,
        }
    }

    /// Whether the marker directory exists.
    pub fn is_initialized(&self) -> bool {
        self.context_dir.is_dir()
    }

    /// Create the directory layout. Idempotent.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [
            &self.temp_dir,
            &self.branch_dir(DEFAULT_BRANCH),
            &self.history_dir(DEFAULT_BRANCH),
            &self.ota_logs_dir(DEFAULT_BRANCH),
            &self.branches_dir,
            &self.archive_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| ContextError::io("create dir", dir, e))?;
        }
        Ok(())
    }

    /// Top directory of a branch: `contexts/main/` or `contexts/branches/<name>/`.
    pub fn branch_dir(&self, branch: &str) -> PathBuf {
        if branch == DEFAULT_BRANCH {
            self.contexts_dir.join(DEFAULT_BRANCH)
        } else {
            self.branches_dir.join(branch)
        }
    }

    pub fn history_dir(&self, branch: &str) -> PathBuf {
        self.branch_dir(branch).join("history")
    }

    pub fn ota_logs_dir(&self, branch: &str) -> PathBuf {
        self.branch_dir(branch).join("ota-logs")
    }

    pub fn commit_dir(&self, branch: &str, id: &str) -> PathBuf {
        self.history_dir(branch).join(format!("commit_{id}"))
    }

    pub fn commit_file(&self, branch: &str, id: &str) -> PathBuf {
        self.commit_dir(branch, id).join("commit.json")
    }

    /// Staged (uncommitted) log file: `temp/ota_<id>.json`.
    pub fn staged_log_file(&self, id: &str) -> PathBuf {
        self.temp_dir.join(format!("ota_{id}.json"))
    }

    /// Walk up from `start` looking for a directory containing the marker.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let mut cur = start.to_path_buf();
        loop {
            if cur.join(CONTEXT_DIR).is_dir() {
                return Some(cur);
            }
            if !cur.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_builds_layout_paths() {
        let p = RepoPaths::discover("/tmp/repo");
        assert_eq!(p.context_dir, PathBuf::from("/tmp/repo/.gitcontext"));
        assert_eq!(p.index_file, PathBuf::from("/tmp/repo/.gitcontext/index.yaml"));
        assert_eq!(p.temp_dir, PathBuf::from("/tmp/repo/.gitcontext/temp"));
        assert_eq!(p.lock_file, PathBuf::from("/tmp/repo/.gitcontext/LOCK"));
        assert_eq!(p.archive_dir, PathBuf::from("/tmp/repo/.gitcontext/archive"));
    }

    #[test]
    fn main_branch_is_not_under_branches() {
        let p = RepoPaths::discover("/tmp/repo");
        assert_eq!(
            p.history_dir("main"),
            PathBuf::from("/tmp/repo/.gitcontext/contexts/main/history")
        );
        assert_eq!(
            p.history_dir("feat/x"),
            PathBuf::from("/tmp/repo/.gitcontext/contexts/branches/feat/x/history")
        );
    }

    #[test]
    fn commit_file_path_shape() {
        let p = RepoPaths::discover("/tmp/repo");
        assert_eq!(
            p.commit_file("main", "abc123def456"),
            PathBuf::from(
                "/tmp/repo/.gitcontext/contexts/main/history/commit_abc123def456/commit.json"
            )
        );
    }

    #[test]
    fn staged_log_file_shape() {
        let p = RepoPaths::discover("/tmp/repo");
        assert_eq!(
            p.staged_log_file("01hx3q"),
            PathBuf::from("/tmp/repo/.gitcontext/temp/ota_01hx3q.json")
        );
    }

    #[test]
    fn ensure_layout_creates_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let p = RepoPaths::discover(tmp.path());
        p.ensure_layout().unwrap();
        assert!(p.temp_dir.is_dir());
        assert!(p.history_dir("main").is_dir());
        assert!(p.ota_logs_dir("main").is_dir());
        assert!(p.branches_dir.is_dir());
        assert!(p.archive_dir.is_dir());
    }

    #[test]
    fn find_root_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        let p = RepoPaths::discover(tmp.path());
        p.ensure_layout().unwrap();
        let nested = tmp.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let found = RepoPaths::find_root(&nested).unwrap();
        assert_eq!(found, tmp.path());
        assert!(RepoPaths::find_root(Path::new("/nonexistent/dir")).is_none());
    }
}
