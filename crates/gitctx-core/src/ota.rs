//! OTA log entries: one recorded unit of thought, action, and observed result.

use crate::clock::now_rfc3339;
use serde::{Deserialize, Serialize};

/// A single OTA log entry.
///
/// Staged entries live as individual files under `temp/` until the next
/// commit; once attached to a commit they are immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtaLog {
    /// Lowercase ULID; lexicographic order is chronological order.
    pub id: String,
    pub thought: String,
    pub action: String,
    pub result: String,
    pub timestamp: String,
    #[serde(default)]
    pub files_affected: Vec<String>,
}

impl OtaLog {
    pub fn new(thought: &str, action: &str, result: &str, files_affected: Vec<String>) -> Self {
        Self {
            id: new_log_id(),
            thought: thought.to_string(),
            action: action.to_string(),
            result: result.to_string(),
            timestamp: now_rfc3339(),
            files_affected,
        }
    }

    /// One-line preview for status and log output.
    pub fn summary(&self) -> String {
        format!("{} -> {}", truncate(&self.thought, 50), truncate(&self.result, 50))
    }
}

fn new_log_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
