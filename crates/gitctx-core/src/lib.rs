pub mod branch;
pub mod clock;
pub mod commit;
pub mod error;
pub mod hash;
pub mod meta;
pub mod ota;
pub mod squash;

pub use branch::{BranchRecord, Index, DEFAULT_BRANCH};
pub use commit::{Alternative, CommitParts, ContextCommit};
pub use error::{ContextError, Result};
pub use meta::{MetaValue, Metadata};
pub use ota::OtaLog;
pub use squash::SquashResult;

/// Commit ID: first 12 hex chars of a SHA-256 content hash.
pub type CommitId = String;

/// Branch name (e.g. "main", "feat/auth")
pub type BranchName = String;
