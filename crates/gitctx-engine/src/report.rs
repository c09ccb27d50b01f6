//! Read-only queries: status and history. These take no lock and never
//! mutate staging, the index, or commit files.

use crate::repo::ContextRepo;
use gitctx_core::{ContextCommit, Result};

/// Snapshot of the repository's current state.
#[derive(Debug, Clone)]
pub struct Status {
    pub current_branch: String,
    pub commits: usize,
    pub latest_commit_id: Option<String>,
    pub latest_commit_message: Option<String>,
    /// Whether staged (uncommitted) logs exist.
    pub uncommitted_changes: bool,
    pub all_branches: Vec<String>,
}

impl ContextRepo {
    /// Current branch, its commit count and tip, and staging state. The
    /// index is re-read fresh; staleness under concurrent writers is
    /// acceptable, corruption is not.
    pub fn status(&self) -> Result<Status> {
        let index = self.store().load_index()?;
        let record = index.current()?;

        let latest = match record.tip() {
            Some(id) => Some(self.store().read_commit(&index.current_branch, id)?),
            None => None,
        };

        Ok(Status {
            current_branch: index.current_branch.clone(),
            commits: record.commits.len(),
            latest_commit_id: latest.as_ref().map(|c| c.id.clone()),
            latest_commit_message: latest.map(|c| c.message),
            uncommitted_changes: self.store().staged_count()? > 0,
            all_branches: index.branch_names(),
        })
    }

    /// A branch's commits, newest first, truncated to `limit`. Defaults to
    /// the current branch.
    pub fn log(&self, branch: Option<&str>, limit: usize) -> Result<Vec<ContextCommit>> {
        let index = self.store().load_index()?;
        let branch = branch.unwrap_or(&index.current_branch);
        let record = index.branch(branch)?;

        record
            .commits
            .iter()
            .rev()
            .take(limit)
            .map(|id| self.store().read_commit(branch, id))
            .collect()
    }
}
