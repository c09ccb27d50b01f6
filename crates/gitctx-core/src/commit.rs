//! Context commits: immutable records of decisions, alternatives, and OTA logs.

use crate::hash::derive_commit_id;
use crate::meta::Metadata;
use crate::ota::OtaLog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An alternative approach that was considered but rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub what: String,
    pub why_rejected: String,
}

impl Alternative {
    pub fn new(what: &str, why_rejected: &str) -> Self {
        Self {
            what: what.to_string(),
            why_rejected: why_rejected.to_string(),
        }
    }
}

/// A commit in the context history.
///
/// Like a source-control commit, but the payload is AI context: the decisions
/// taken, the alternatives rejected, and the OTA logs staged since the parent.
/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextCommit {
    pub id: String,
    pub message: String,
    pub timestamp: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(default)]
    pub ota_logs: Vec<OtaLog>,
    /// Path -> content digest, supplied by the caller.
    #[serde(default)]
    pub files_snapshot: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Identity-bearing and payload parts of a commit about to be created.
pub struct CommitParts {
    pub message: String,
    pub timestamp: String,
    pub parent: Option<String>,
    pub decisions: Vec<String>,
    pub alternatives: Vec<Alternative>,
    pub ota_logs: Vec<OtaLog>,
    pub files_snapshot: BTreeMap<String, String>,
    pub metadata: Metadata,
}

impl ContextCommit {
    /// Build a commit, deriving its id from parent, message, timestamp, and
    /// the staged logs. Same parts, same id.
    pub fn build(parts: CommitParts) -> Self {
        let id = derive_commit_id(
            parts.parent.as_deref(),
            &parts.message,
            &parts.timestamp,
            &parts.ota_logs,
        );
        Self {
            id,
            message: parts.message,
            timestamp: parts.timestamp,
            parent: parts.parent,
            decisions: parts.decisions,
            alternatives: parts.alternatives,
            ota_logs: parts.ota_logs,
            files_snapshot: parts.files_snapshot,
            metadata: parts.metadata,
        }
    }

    /// Abbreviated id for display.
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(8)]
    }
}
