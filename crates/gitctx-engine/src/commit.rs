//! Commit engine: turn staged logs plus supplied context into one commit.

use crate::repo::ContextRepo;
use gitctx_core::{
    clock::now_rfc3339, Alternative, CommitParts, ContextCommit, ContextError, Metadata, Result,
};
use std::collections::BTreeMap;
use tracing::info;

/// Context supplied alongside the commit message. The files snapshot is an
/// already-built path -> digest mapping; the engine never reads the working
/// tree itself.
#[derive(Debug, Default)]
pub struct CommitOptions {
    pub decisions: Vec<String>,
    pub alternatives: Vec<Alternative>,
    pub files_snapshot: BTreeMap<String, String>,
    pub metadata: Metadata,
}

impl ContextRepo {
    /// Create a commit on the current branch from everything staged since
    /// the previous commit. Staged logs are consumed exactly once: on any
    /// failure before the commit file is durably written, the staging area
    /// is left intact so the call can simply be re-issued.
    pub fn commit(&self, message: &str, options: CommitOptions) -> Result<ContextCommit> {
        let _lock = self.store().lock()?;
        let mut index = self.store().load_index()?;

        let staged = self.store().list_staged_logs()?;
        if staged.is_empty() && options.decisions.is_empty() && options.alternatives.is_empty() {
            return Err(ContextError::NothingToCommit);
        }

        let branch = index.current_branch.clone();
        let parent = index.current()?.tip().map(String::from);

        let commit = ContextCommit::build(CommitParts {
            message: message.to_string(),
            timestamp: now_rfc3339(),
            parent,
            decisions: options.decisions,
            alternatives: options.alternatives,
            ota_logs: staged,
            files_snapshot: options.files_snapshot,
            metadata: options.metadata,
        });

        self.store().write_commit(&branch, &commit)?;
        index.branch_mut(&branch)?.record_commit(commit.id.clone());
        self.store().save_index(&index)?;
        // Only now is the staged work consumed.
        self.store().clear_staged_logs()?;

        info!(branch = %branch, id = %commit.id, message, "committed");
        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> (tempfile::TempDir, ContextRepo) {
        let tmp = tempfile::tempdir().unwrap();
        let repo = ContextRepo::init(tmp.path()).unwrap();
        (tmp, repo)
    }

    #[test]
    fn commit_consumes_staged_logs_in_order() {
        let (_tmp, repo) = repo();
        repo.stage_log("first", "a", "r", vec![]).unwrap();
        repo.stage_log("second", "a", "r", vec![]).unwrap();

        let commit = repo.commit("add x", CommitOptions::default()).unwrap();
        assert_eq!(commit.ota_logs.len(), 2);
        assert_eq!(commit.ota_logs[0].thought, "first");
        assert_eq!(commit.ota_logs[1].thought, "second");
        assert_eq!(repo.store().staged_count().unwrap(), 0);
    }

    #[test]
    fn commits_chain_and_tip_follows() {
        let (_tmp, repo) = repo();
        let mut ids = Vec::new();
        for n in 0..3 {
            repo.stage_log(&format!("t{n}"), "a", "r", vec![]).unwrap();
            ids.push(repo.commit(&format!("c{n}"), CommitOptions::default()).unwrap().id);
        }

        let index = repo.store().load_index().unwrap();
        let record = index.branch("main").unwrap();
        assert_eq!(record.commits, ids);
        assert_eq!(record.current_commit.as_deref(), Some(ids[2].as_str()));

        let last = repo.store().read_commit("main", &ids[2]).unwrap();
        assert_eq!(last.parent.as_deref(), Some(ids[1].as_str()));
    }

    #[test]
    fn empty_commit_rejected_without_mutation() {
        let (_tmp, repo) = repo();
        let before = std::fs::read(&repo.store().paths.index_file).unwrap();

        assert!(matches!(
            repo.commit("empty", CommitOptions::default()),
            Err(ContextError::NothingToCommit)
        ));

        let after = std::fs::read(&repo.store().paths.index_file).unwrap();
        assert_eq!(before, after);
        assert_eq!(repo.store().staged_count().unwrap(), 0);
    }

    #[test]
    fn explicit_decisions_allow_commit_without_logs() {
        let (_tmp, repo) = repo();
        let commit = repo
            .commit(
                "decision only",
                CommitOptions {
                    decisions: vec!["use sqlite".to_string()],
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(commit.ota_logs.is_empty());
        assert_eq!(commit.decisions, vec!["use sqlite"]);
    }

    #[test]
    fn first_commit_has_no_parent() {
        let (_tmp, repo) = repo();
        repo.stage_log("t", "a", "r", vec![]).unwrap();
        let commit = repo.commit("root", CommitOptions::default()).unwrap();
        assert!(commit.parent.is_none());
    }

    #[test]
    fn snapshot_and_metadata_are_stored_verbatim() {
        let (_tmp, repo) = repo();
        let mut snapshot = BTreeMap::new();
        snapshot.insert("src/lib.rs".to_string(), "ab12cd34".to_string());
        let mut metadata = Metadata::new();
        metadata.insert("origin".into(), "editor".into());

        repo.stage_log("t", "a", "r", vec![]).unwrap();
        let commit = repo
            .commit(
                "with snapshot",
                CommitOptions {
                    files_snapshot: snapshot.clone(),
                    metadata: metadata.clone(),
                    ..Default::default()
                },
            )
            .unwrap();

        let back = repo.store().read_commit("main", &commit.id).unwrap();
        assert_eq!(back.files_snapshot, snapshot);
        assert_eq!(back.metadata, metadata);
    }

    #[test]
    fn failed_write_leaves_staging_intact() {
        let (_tmp, repo) = repo();
        repo.stage_log("t", "a", "r", vec![]).unwrap();

        // Force the commit write to fail by replacing the history dir with
        // a plain file.
        let history = repo.store().paths.history_dir("main");
        std::fs::remove_dir_all(&history).unwrap();
        std::fs::write(&history, b"not a dir").unwrap();

        assert!(repo.commit("will fail", CommitOptions::default()).is_err());
        assert_eq!(repo.store().staged_count().unwrap(), 1);

        // Restore and retry: the same staged log lands in the commit.
        std::fs::remove_file(&history).unwrap();
        std::fs::create_dir_all(&history).unwrap();
        let commit = repo.commit("retried", CommitOptions::default()).unwrap();
        assert_eq!(commit.ota_logs.len(), 1);
        assert_eq!(repo.store().staged_count().unwrap(), 0);
    }
}
