//! Branch records and the repository index.

use crate::clock::now_rfc3339;
use crate::error::{ContextError, Result};
use crate::meta::Metadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The branch every repository starts with.
pub const DEFAULT_BRANCH: &str = "main";

/// Index schema version.
pub const INDEX_VERSION: &str = "1.0";

/// Per-branch state recorded in the index. The branch name is the map key
/// in [`Index::branches`]; it is not repeated inside the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    pub created: String,
    pub last_modified: String,
    pub current_commit: Option<String>,
    #[serde(default)]
    pub commits: Vec<String>,
    #[serde(default)]
    pub parent: Option<String>,
    /// Last-merged source commit id, per source branch. Makes repeated
    /// merges incremental instead of cumulative.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub merge_bases: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl BranchRecord {
    /// A fresh branch: empty history, lineage recorded via `parent`.
    pub fn new(parent: Option<String>) -> Self {
        let now = now_rfc3339();
        Self {
            created: now.clone(),
            last_modified: now,
            current_commit: None,
            commits: Vec::new(),
            parent,
            merge_bases: BTreeMap::new(),
            metadata: Metadata::new(),
        }
    }

    /// Tip of the branch, if any commits exist.
    pub fn tip(&self) -> Option<&str> {
        self.current_commit.as_deref()
    }

    /// Append a commit id and advance the tip.
    pub fn record_commit(&mut self, id: String) {
        self.commits.push(id.clone());
        self.current_commit = Some(id);
        self.last_modified = now_rfc3339();
    }

    fn validate(&self, name: &str) -> Result<()> {
        match (&self.current_commit, self.commits.last()) {
            (Some(cur), Some(last)) if cur == last => Ok(()),
            (None, None) => Ok(()),
            _ => Err(ContextError::CorruptIndex(format!(
                "branch {name}: current_commit does not match the last commit"
            ))),
        }
    }
}

/// The singleton repository index: current branch pointer plus every
/// branch record. Reloaded fresh from disk by every engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub version: String,
    pub created: String,
    pub current_branch: String,
    pub branches: BTreeMap<String, BranchRecord>,
}

impl Index {
    /// A new index with an empty `main` branch selected.
    pub fn new() -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(DEFAULT_BRANCH.to_string(), BranchRecord::new(None));
        Self {
            version: INDEX_VERSION.to_string(),
            created: now_rfc3339(),
            current_branch: DEFAULT_BRANCH.to_string(),
            branches,
        }
    }

    /// Structural validation. An index that fails here is never written back.
    pub fn validate(&self) -> Result<()> {
        if self.branches.is_empty() {
            return Err(ContextError::CorruptIndex("no branches".to_string()));
        }
        if !self.branches.contains_key(&self.current_branch) {
            return Err(ContextError::CorruptIndex(format!(
                "current_branch {:?} is not a known branch",
                self.current_branch
            )));
        }
        for (name, record) in &self.branches {
            record.validate(name)?;
        }
        Ok(())
    }

    pub fn branch(&self, name: &str) -> Result<&BranchRecord> {
        self.branches
            .get(name)
            .ok_or_else(|| ContextError::BranchNotFound(name.to_string()))
    }

    pub fn branch_mut(&mut self, name: &str) -> Result<&mut BranchRecord> {
        self.branches
            .get_mut(name)
            .ok_or_else(|| ContextError::BranchNotFound(name.to_string()))
    }

    pub fn current(&self) -> Result<&BranchRecord> {
        self.branch(&self.current_branch)
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.branches.keys().cloned().collect()
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}
