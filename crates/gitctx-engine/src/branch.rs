//! Branch manager: create, switch, delete, list.

use crate::repo::ContextRepo;
use gitctx_core::{BranchRecord, ContextError, Result};
use tracing::info;

/// Branch names: 1-64 characters of `[A-Za-z0-9._/-]`.
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 {
        return Err(ContextError::InvalidBranchName(format!(
            "{name:?}: must be 1-64 characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' || c == '/')
    {
        return Err(ContextError::InvalidBranchName(format!(
            "{name:?}: only [A-Za-z0-9._/-] allowed"
        )));
    }
    Ok(())
}

impl ContextRepo {
    /// Fork a new branch from `from` (default: the current branch). The new
    /// branch starts with an empty commit chain; lineage is recorded via
    /// `parent`, not by copying commit files.
    pub fn create_branch(&self, name: &str, from: Option<&str>) -> Result<()> {
        validate_branch_name(name)?;
        let _lock = self.store().lock()?;
        let mut index = self.store().load_index()?;

        if index.branches.contains_key(name) {
            return Err(ContextError::BranchExists(name.to_string()));
        }
        let source = from.unwrap_or(&index.current_branch).to_string();
        index.branch(&source)?;

        index
            .branches
            .insert(name.to_string(), BranchRecord::new(Some(source.clone())));
        self.store().ensure_branch_layout(name)?;
        self.store().save_index(&index)?;
        info!(branch = name, from = %source, "created branch");
        Ok(())
    }

    /// Point the repository at another branch. Refused while staged logs
    /// exist, so uncommitted work is never silently orphaned.
    pub fn switch_branch(&self, name: &str) -> Result<()> {
        let _lock = self.store().lock()?;
        let mut index = self.store().load_index()?;
        index.branch(name)?;

        if index.current_branch == name {
            return Ok(());
        }
        let staged = self.store().staged_count()?;
        if staged > 0 {
            return Err(ContextError::UncommittedChanges { staged });
        }

        index.current_branch = name.to_string();
        self.store().save_index(&index)?;
        info!(branch = name, "switched branch");
        Ok(())
    }

    /// Archive a branch's history and drop its record. The current branch
    /// cannot be deleted.
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let _lock = self.store().lock()?;
        let mut index = self.store().load_index()?;

        if index.current_branch == name {
            return Err(ContextError::CannotDeleteCurrentBranch(name.to_string()));
        }
        let record = index.branch(name)?.clone();

        let manifest = serde_json::json!({
            "branch": name,
            "archived_at": gitctx_core::clock::now_rfc3339(),
            "record": record,
        });
        self.store().archive_branch(name, &manifest)?;

        index.branches.remove(name);
        self.store().save_index(&index)?;
        info!(branch = name, "deleted branch (archived)");
        Ok(())
    }

    /// All branch names, sorted.
    pub fn branches(&self) -> Result<Vec<String>> {
        Ok(self.store().load_index()?.branch_names())
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
    fn create_branch_records_lineage_with_empty_history() {
        let (_tmp, repo) = repo();
        repo.stage_log("t", "a", "r", vec![]).unwrap();
        repo.commit("seed main", Default::default()).unwrap();

        repo.create_branch("feat/x", None).unwrap();
        let index = repo.store().load_index().unwrap();
        let record = index.branch("feat/x").unwrap();
        assert_eq!(record.parent.as_deref(), Some("main"));
        assert!(record.commits.is_empty());
        assert!(record.current_commit.is_none());
    }

    #[test]
    fn create_existing_branch_fails() {
        let (_tmp, repo) = repo();
        repo.create_branch("feat/x", None).unwrap();
        assert!(matches!(
            repo.create_branch("feat/x", None),
            Err(ContextError::BranchExists(_))
        ));
    }

    #[test]
    fn create_from_missing_branch_fails() {
        let (_tmp, repo) = repo();
        assert!(matches!(
            repo.create_branch("feat/x", Some("ghost")),
            Err(ContextError::BranchNotFound(_))
        ));
    }

    #[test]
    fn invalid_names_rejected() {
        let (_tmp, repo) = repo();
        assert!(matches!(
            repo.create_branch("", None),
            Err(ContextError::InvalidBranchName(_))
        ));
        assert!(matches!(
            repo.create_branch("bad name", None),
            Err(ContextError::InvalidBranchName(_))
        ));
        assert!(matches!(
            repo.create_branch(&"x".repeat(65), None),
            Err(ContextError::InvalidBranchName(_))
        ));
    }

    #[test]
    fn switch_and_switch_back_is_byte_identical() {
        let (_tmp, repo) = repo();
        repo.create_branch("feat/x", None).unwrap();

        let before = std::fs::read(&repo.store().paths.index_file).unwrap();
        repo.switch_branch("feat/x").unwrap();
        repo.switch_branch("main").unwrap();
        let after = std::fs::read(&repo.store().paths.index_file).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn switch_with_staged_logs_fails() {
        let (_tmp, repo) = repo();
        repo.create_branch("feat/x", None).unwrap();
        repo.stage_log("t", "a", "r", vec![]).unwrap();
        assert!(matches!(
            repo.switch_branch("feat/x"),
            Err(ContextError::UncommittedChanges { staged: 1 })
        ));

        // Still on main, staging intact.
        let index = repo.store().load_index().unwrap();
        assert_eq!(index.current_branch, "main");
        assert_eq!(repo.store().staged_count().unwrap(), 1);
    }

    #[test]
    fn switch_to_missing_branch_fails() {
        let (_tmp, repo) = repo();
        assert!(matches!(
            repo.switch_branch("ghost"),
            Err(ContextError::BranchNotFound(_))
        ));
    }

    #[test]
    fn delete_current_branch_fails_and_leaves_index_unchanged() {
        let (_tmp, repo) = repo();
        let before = std::fs::read(&repo.store().paths.index_file).unwrap();
        assert!(matches!(
            repo.delete_branch("main"),
            Err(ContextError::CannotDeleteCurrentBranch(_))
        ));
        let after = std::fs::read(&repo.store().paths.index_file).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn delete_branch_archives_its_history() {
        let (_tmp, repo) = repo();
        repo.create_branch("feat/x", None).unwrap();
        repo.switch_branch("feat/x").unwrap();
        repo.stage_log("t", "a", "r", vec![]).unwrap();
        repo.commit("on feature", Default::default()).unwrap();
        repo.switch_branch("main").unwrap();

        repo.delete_branch("feat/x").unwrap();
        let index = repo.store().load_index().unwrap();
        assert!(!index.branches.contains_key("feat/x"));

        let archives: Vec<_> = std::fs::read_dir(&repo.store().paths.archive_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(archives.len(), 1);
        assert!(archives[0].join("branch_archive.json").exists());
    }

    #[test]
    fn branches_lists_all_sorted() {
        let (_tmp, repo) = repo();
        repo.create_branch("zeta", None).unwrap();
        repo.create_branch("alpha", None).unwrap();
        assert_eq!(repo.branches().unwrap(), vec!["alpha", "main", "zeta"]);
    }
}
