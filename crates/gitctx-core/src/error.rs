//! Error taxonomy for gitctx operations.
//!
//! Every engine and store operation returns one of these kinds; validation
//! variants are raised before any mutation is attempted.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for Results in gitctx.
pub type Result<T> = std::result::Result<T, ContextError>;

/// All gitctx error kinds.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("not a gitctx repository ({} not found); run `gitctx init` first", .0.display())]
    NotInitialized(PathBuf),

    #[error("branch already exists: {0}")]
    BranchExists(String),

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("cannot delete the current branch: {0}")]
    CannotDeleteCurrentBranch(String),

    #[error("cannot merge branch {0} into itself")]
    SelfMerge(String),

    #[error("{staged} staged log(s) would be orphaned; commit or discard them first")]
    UncommittedChanges { staged: usize },

    #[error("nothing to commit: no staged logs, decisions, or alternatives")]
    NothingToCommit,

    #[error("duplicate commit id: {0}")]
    DuplicateCommit(String),

    #[error("repository is locked by another process ({})", .0.display())]
    RepositoryLocked(PathBuf),

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("{op} failed for {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContextError {
    /// Wrap an I/O error with the operation and path it occurred on.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContextError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Wrap a serialization error as invalid-data I/O on the offending path.
    pub fn decode(
        op: &'static str,
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ContextError::Io {
            op,
            path: path.into(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
        }
    }
}
