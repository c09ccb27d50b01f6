//! Squash-merge result and the dedup rules it is built with.

use crate::commit::Alternative;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Distilled outcome of squashing a branch's new commits into one summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquashResult {
    pub decisions: Vec<String>,
    pub rejected_alternatives: Vec<Alternative>,
    pub key_insights: Vec<String>,
    pub architecture_summary: String,
    pub ota_count: usize,
    pub original_commits: usize,
    pub branch_name: String,
    pub merged_at: String,
}

impl SquashResult {
    /// Human-readable rendition, written into the archive next to the raw data.
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            format!("# Squash merge: {}", self.branch_name),
            String::new(),
            format!("Merged: {}", self.merged_at),
            format!("Original commits: {} -> summarized", self.original_commits),
            format!("OTA logs absorbed: {}", self.ota_count),
            String::new(),
            "## Decisions".to_string(),
        ];
        for d in &self.decisions {
            lines.push(format!("- {d}"));
        }
        lines.extend([String::new(), "## Rejected alternatives".to_string()]);
        for alt in &self.rejected_alternatives {
            lines.push(format!("- **{}**: {}", alt.what, alt.why_rejected));
        }
        lines.extend([String::new(), "## Key insights".to_string()]);
        for insight in &self.key_insights {
            lines.push(format!("- {insight}"));
        }
        lines.extend([
            String::new(),
            "## Architecture summary".to_string(),
            self.architecture_summary.clone(),
        ]);
        lines.join("\n")
    }
}

/// Deduplicate by exact string equality, preserving first-seen order.
pub fn dedupe_decisions(decisions: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    decisions
        .into_iter()
        .filter(|d| seen.insert(d.clone()))
        .collect()
}

/// Deduplicate alternatives keyed by `what`, preserving first-seen order.
pub fn dedupe_alternatives(
    alternatives: impl IntoIterator<Item = Alternative>,
) -> Vec<Alternative> {
    let mut seen = HashSet::new();
    alternatives
        .into_iter()
        .filter(|a| seen.insert(a.what.clone()))
        .collect()
}
