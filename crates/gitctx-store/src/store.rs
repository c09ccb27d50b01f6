//! The repository store: every read and write of the on-disk layout.
//!
//! All mutations are atomic (write-temp-then-rename); a process kill leaves
//! the repository in the pre- or post-operation state, never torn.

use crate::config::StoreConfig;
use crate::fsio;
use crate::lock::RepoLock;
use crate::paths::RepoPaths;
use crate::staging;
use gitctx_core::{ContextCommit, ContextError, Index, OtaLog, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct RepoStore {
    pub paths: RepoPaths,
    config: StoreConfig,
}

impl RepoStore {
    /// Create the repository layout and the initial index with `main`
    /// selected. Fails if the marker directory already exists.
    pub fn initialize(repo_root: impl Into<PathBuf>) -> Result<Self> {
        Self::initialize_with(repo_root, StoreConfig::default())
    }

    pub fn initialize_with(repo_root: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        let paths = RepoPaths::with_dir_name(repo_root, &config.context_dir);
        if paths.is_initialized() {
            return Err(ContextError::AlreadyInitialized(paths.context_dir));
        }
        paths.ensure_layout()?;
        let store = Self { paths, config };
        let _lock = store.lock()?;
        store.save_index(&Index::new())?;
        debug!(dir = %store.paths.context_dir.display(), "initialized repository");
        Ok(store)
    }

    /// Open an existing repository. Fails if the marker is absent.
    pub fn open(repo_root: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(repo_root, StoreConfig::default())
    }

    pub fn open_with(repo_root: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        let paths = RepoPaths::with_dir_name(repo_root, &config.context_dir);
        if !paths.is_initialized() {
            return Err(ContextError::NotInitialized(paths.context_dir));
        }
        Ok(Self { paths, config })
    }

    /// Acquire the repository lock with the configured bounded wait.
    pub fn lock(&self) -> Result<RepoLock> {
        RepoLock::acquire(&self.paths, self.config.lock_timeout)
    }

    /// Create the history and ota-logs directories for a branch. Idempotent.
    pub fn ensure_branch_layout(&self, branch: &str) -> Result<()> {
        for dir in [self.paths.history_dir(branch), self.paths.ota_logs_dir(branch)] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| ContextError::io("create branch dir", &dir, e))?;
        }
        Ok(())
    }

    // ── Index ────────────────────────────────────────────────────────

    /// Load and structurally validate the index.
    pub fn load_index(&self) -> Result<Index> {
        let text = std::fs::read_to_string(&self.paths.index_file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ContextError::CorruptIndex("index.yaml is missing".to_string())
            } else {
                ContextError::io("read index", &self.paths.index_file, e)
            }
        })?;
        let index: Index = serde_yaml::from_str(&text)
            .map_err(|e| ContextError::CorruptIndex(e.to_string()))?;
        index.validate()?;
        Ok(index)
    }

    /// Persist the index atomically. Refuses to write an index that fails
    /// validation, so corruption never propagates to disk.
    pub fn save_index(&self, index: &Index) -> Result<()> {
        index.validate()?;
        let yaml = serde_yaml::to_string(index)
            .map_err(|e| ContextError::decode("encode index", &self.paths.index_file, e))?;
        fsio::write_atomic(&self.paths.index_file, yaml.as_bytes())
    }

    // ── Commits ──────────────────────────────────────────────────────

    pub fn read_commit(&self, branch: &str, id: &str) -> Result<ContextCommit> {
        fsio::read_json(&self.paths.commit_file(branch, id))
    }

    /// Write a commit and mirror its OTA logs for browsing. Commit ids are
    /// unique across the whole repository, not just the branch.
    pub fn write_commit(&self, branch: &str, commit: &ContextCommit) -> Result<()> {
        if self.commit_exists(&commit.id)? {
            return Err(ContextError::DuplicateCommit(commit.id.clone()));
        }
        fsio::write_json_atomic(&self.paths.commit_file(branch, &commit.id), commit)?;

        let ota_dir = self.paths.ota_logs_dir(branch);
        for log in &commit.ota_logs {
            fsio::write_json_atomic(&ota_dir.join(format!("{}.json", log.id)), log)?;
        }
        debug!(branch, id = %commit.id, logs = commit.ota_logs.len(), "wrote commit");
        Ok(())
    }

    /// Whether any branch's history contains this commit id.
    pub fn commit_exists(&self, id: &str) -> Result<bool> {
        let needle = format!("commit_{id}");
        find_dir_named(&self.paths.contexts_dir, &needle)
    }

    // ── Staging ──────────────────────────────────────────────────────

    pub fn append_staged_log(&self, log: &OtaLog) -> Result<()> {
        staging::append_staged_log(&self.paths, log)
    }

    pub fn list_staged_logs(&self) -> Result<Vec<OtaLog>> {
        staging::list_staged_logs(&self.paths)
    }

    pub fn staged_count(&self) -> Result<usize> {
        staging::staged_count(&self.paths)
    }

    pub fn clear_staged_logs(&self) -> Result<()> {
        staging::clear_staged_logs(&self.paths)
    }

    // ── Archive ──────────────────────────────────────────────────────

    /// Move a branch's history to the archive and write a manifest.
    /// Archived data is never erased by normal operation.
    pub fn archive_branch(
        &self,
        name: &str,
        manifest: &serde_json::Value,
    ) -> Result<PathBuf> {
        let stamp = gitctx_core::clock::compact_stamp();
        let archive_path = self
            .paths
            .archive_dir
            .join(format!("{}_{stamp}", name.replace('/', "_")));
        std::fs::create_dir_all(&archive_path)
            .map_err(|e| ContextError::io("create archive dir", &archive_path, e))?;

        let branch_dir = self.paths.branch_dir(name);
        if branch_dir.exists() {
            let dest = archive_path.join("branch");
            std::fs::rename(&branch_dir, &dest)
                .map_err(|e| ContextError::io("archive branch", &branch_dir, e))?;
        }
        fsio::write_json_atomic(&archive_path.join("branch_archive.json"), manifest)?;
        debug!(branch = name, to = %archive_path.display(), "archived branch");
        Ok(archive_path)
    }
}

fn find_dir_named(under: &Path, needle: &str) -> Result<bool> {
    if !under.is_dir() {
        return Ok(false);
    }
    let entries =
        std::fs::read_dir(under).map_err(|e| ContextError::io("scan history", under, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ContextError::io("scan history", under, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy() == needle {
            return Ok(true);
        }
        if find_dir_named(&entry.path(), needle)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitctx_core::{CommitParts, Metadata, DEFAULT_BRANCH};
    use std::collections::BTreeMap;

    fn commit(message: &str, parent: Option<&str>, logs: Vec<OtaLog>) -> ContextCommit {
        ContextCommit::build(CommitParts {
            message: message.to_string(),
            timestamp: gitctx_core::clock::now_rfc3339(),
            parent: parent.map(|s| s.to_string()),
            decisions: vec![],
            alternatives: vec![],
            ota_logs: logs,
            files_snapshot: BTreeMap::new(),
            metadata: Metadata::new(),
        })
    }

    #[test]
    fn initialize_then_open() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RepoStore::initialize(tmp.path()).unwrap();
        let index = store.load_index().unwrap();
        assert_eq!(index.current_branch, DEFAULT_BRANCH);

        let reopened = RepoStore::open(tmp.path()).unwrap();
        assert_eq!(reopened.load_index().unwrap(), index);
    }

    #[test]
    fn initialize_twice_fails() {
        let tmp = tempfile::tempdir().unwrap();
        RepoStore::initialize(tmp.path()).unwrap();
        assert!(matches!(
            RepoStore::initialize(tmp.path()),
            Err(ContextError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn open_uninitialized_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            RepoStore::open(tmp.path()),
            Err(ContextError::NotInitialized(_))
        ));
    }

    #[test]
    fn corrupt_index_is_rejected_on_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RepoStore::initialize(tmp.path()).unwrap();
        std::fs::write(&store.paths.index_file, "current_branch: ghost\n").unwrap();
        assert!(matches!(
            store.load_index(),
            Err(ContextError::CorruptIndex(_))
        ));
    }

    #[test]
    fn save_refuses_invalid_index() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RepoStore::initialize(tmp.path()).unwrap();
        let mut index = store.load_index().unwrap();
        index.current_branch = "ghost".to_string();
        assert!(store.save_index(&index).is_err());

        // On-disk index is untouched.
        assert!(store.load_index().is_ok());
    }

    #[test]
    fn write_then_read_commit() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RepoStore::initialize(tmp.path()).unwrap();
        let log = OtaLog::new("t", "a", "r", vec![]);
        let c = commit("add x", None, vec![log.clone()]);
        store.write_commit(DEFAULT_BRANCH, &c).unwrap();

        let back = store.read_commit(DEFAULT_BRANCH, &c.id).unwrap();
        assert_eq!(back, c);

        // OTA log mirrored for browsing.
        let mirrored = store
            .paths
            .ota_logs_dir(DEFAULT_BRANCH)
            .join(format!("{}.json", log.id));
        assert!(mirrored.exists());
    }

    #[test]
    fn duplicate_commit_id_rejected_across_branches() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RepoStore::initialize(tmp.path()).unwrap();
        let c = commit("same", None, vec![]);
        store.write_commit(DEFAULT_BRANCH, &c).unwrap();
        assert!(matches!(
            store.write_commit("feat/x", &c),
            Err(ContextError::DuplicateCommit(_))
        ));
    }

    #[test]
    fn archive_branch_moves_history() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RepoStore::initialize(tmp.path()).unwrap();
        let c = commit("on feature", None, vec![]);
        store.write_commit("feat/x", &c).unwrap();

        let archive_path = store
            .archive_branch("feat/x", &serde_json::json!({"branch": "feat/x"}))
            .unwrap();
        assert!(archive_path.join("branch_archive.json").exists());
        assert!(archive_path
            .join("branch/history")
            .join(format!("commit_{}", c.id))
            .exists());
        assert!(!store.paths.branch_dir("feat/x").exists());
    }

    #[test]
    fn interrupted_index_write_leaves_old_index_readable() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RepoStore::initialize(tmp.path()).unwrap();
        let index = store.load_index().unwrap();

        // Simulate a crash between temp-file write and rename: the new
        // content sits in an unrenamed temp file next to the index.
        let orphan = tempfile::NamedTempFile::new_in(&store.paths.context_dir).unwrap();
        std::fs::write(orphan.path(), b"current_branch: torn\n").unwrap();

        // The index read is untouched by the orphan.
        assert_eq!(store.load_index().unwrap(), index);
    }

    #[test]
    fn custom_context_dir_name() {
        let tmp = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            context_dir: ".ctx".to_string(),
            ..StoreConfig::default()
        };
        RepoStore::initialize_with(tmp.path(), config.clone()).unwrap();
        assert!(tmp.path().join(".ctx/index.yaml").exists());
        assert!(RepoStore::open_with(tmp.path(), config).is_ok());
    }
}
