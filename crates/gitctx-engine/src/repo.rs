//! The engine's entry point: a handle over one on-disk repository.
//!
//! No state is cached between operations; every call reloads the index from
//! disk, so durability comes entirely from what the store has written.

use gitctx_core::{OtaLog, Result};
use gitctx_store::{RepoStore, StoreConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ContextRepo {
    store: RepoStore,
}

impl ContextRepo {
    /// Initialize a new repository at `root`.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: RepoStore::initialize_with(root, StoreConfig::from_env())?,
        })
    }

    /// Open an existing repository at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: RepoStore::open_with(root, StoreConfig::from_env())?,
        })
    }

    /// Open the repository containing `start`, walking up like source
    /// control does. Falls back to `start` itself so the not-initialized
    /// error names a sensible path.
    pub fn open_from(start: &Path) -> Result<Self> {
        let root = gitctx_store::RepoPaths::find_root(start)
            .unwrap_or_else(|| start.to_path_buf());
        Self::open(root)
    }

    pub fn store(&self) -> &RepoStore {
        &self.store
    }

    /// Stage one OTA log entry. It stays in the staging area until the next
    /// commit consumes it or `discard_staged` drops it.
    pub fn stage_log(
        &self,
        thought: &str,
        action: &str,
        result: &str,
        files_affected: Vec<String>,
    ) -> Result<OtaLog> {
        let _lock = self.store.lock()?;
        let log = OtaLog::new(thought, action, result, files_affected);
        self.store.append_staged_log(&log)?;
        debug!(id = %log.id, "staged OTA log");
        Ok(log)
    }

    /// Drop every staged log without committing. Returns how many were dropped.
    pub fn discard_staged(&self) -> Result<usize> {
        let _lock = self.store.lock()?;
        let count = self.store.staged_count()?;
        self.store.clear_staged_logs()?;
        Ok(count)
    }
}
