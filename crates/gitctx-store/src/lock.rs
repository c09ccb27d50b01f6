//! Cross-process repository lock backed by `.gitcontext/LOCK`.
//!
//! Every mutating operation holds this for its whole duration. Reads do not.

use crate::paths::RepoPaths;
use fs2::FileExt;
use gitctx_core::{ContextError, Result};
use std::fs::{File, OpenOptions};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exclusive advisory lock. Released when dropped.
#[derive(Debug)]
pub struct RepoLock {
    _file: File,
}

impl RepoLock {
    /// Acquire the lock, polling up to `timeout` before giving up with
    /// `RepositoryLocked`. Never blocks indefinitely.
    pub fn acquire(paths: &RepoPaths, timeout: Duration) -> Result<Self> {
        if let Some(parent) = paths.lock_file.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ContextError::io("create dir", parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&paths.lock_file)
            .map_err(|e| ContextError::io("open lock", &paths.lock_file, e))?;

        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Self { _file: file }),
                Err(_) if Instant::now() < deadline => std::thread::sleep(POLL_INTERVAL),
                Err(_) => return Err(ContextError::RepositoryLocked(paths.lock_file.clone())),
            }
        }
    }
}
