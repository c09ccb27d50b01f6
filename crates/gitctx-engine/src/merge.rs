//! Merge engine: fold one branch's new commits into another, either by
//! replaying every commit or by squashing them into one summary commit.
//!
//! Merges are incremental: the target branch records, per source, the last
//! source commit it absorbed, so repeating a merge only picks up the delta.

use crate::repo::ContextRepo;
use gitctx_core::{
    clock::now_rfc3339,
    squash::{dedupe_alternatives, dedupe_decisions},
    CommitParts, ContextCommit, ContextError, Metadata, MetaValue, OtaLog, Result, SquashResult,
};
use gitctx_summarize::{degraded_summary, SummarizeRequest, Summarizer, Summary};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// What a merge did, returned so callers can display what was folded in.
#[derive(Debug)]
pub struct MergeOutcome {
    /// False when the source had no new commits; nothing was written.
    pub merged: bool,
    /// The synthetic squash commit, when squashing.
    pub commit_id: Option<String>,
    /// Ids of the re-homed commits, in original order, when replaying.
    pub replayed: Vec<String>,
    /// The distilled summary, when squashing.
    pub squash: Option<SquashResult>,
    /// True when the summarizer failed and the deterministic fallback was
    /// used instead.
    pub degraded_summary: bool,
}

impl MergeOutcome {
    fn no_op() -> Self {
        Self {
            merged: false,
            commit_id: None,
            replayed: Vec::new(),
            squash: None,
            degraded_summary: false,
        }
    }
}

impl ContextRepo {
    /// Merge `source` into `target` (default: the current branch).
    ///
    /// With `squash` the new source commits collapse into one summary commit
    /// synthesized with `summarizer`; without it they are replayed one by
    /// one onto the target tip. The source branch is left intact either way.
    pub fn merge(
        &self,
        source: &str,
        target: Option<&str>,
        squash: bool,
        summarizer: &dyn Summarizer,
    ) -> Result<MergeOutcome> {
        let _lock = self.store().lock()?;
        let mut index = self.store().load_index()?;

        let target = target.unwrap_or(&index.current_branch).to_string();
        index.branch(source)?;
        index.branch(&target)?;
        if source == target {
            return Err(ContextError::SelfMerge(source.to_string()));
        }

        let new_ids = new_commit_ids(
            &index.branch(source)?.commits,
            index.branch(&target)?.merge_bases.get(source),
        );
        if new_ids.is_empty() {
            info!(source, into = %target, "merge is a no-op: no new commits");
            return Ok(MergeOutcome::no_op());
        }

        let commits: Vec<ContextCommit> = new_ids
            .iter()
            .map(|id| self.store().read_commit(source, id))
            .collect::<Result<_>>()?;
        let source_tip = new_ids.last().cloned().unwrap_or_default();

        let outcome = if squash {
            self.squash_onto(&mut index, source, &target, &commits, summarizer)?
        } else {
            self.replay_onto(&mut index, source, &target, &commits)?
        };

        index
            .branch_mut(&target)?
            .merge_bases
            .insert(source.to_string(), source_tip);
        self.store().save_index(&index)?;
        info!(
            source,
            into = %target,
            squash,
            commits = commits.len(),
            "merged"
        );
        Ok(outcome)
    }

    /// Squash: aggregate every new source commit into one synthetic commit
    /// whose body is the SquashResult.
    fn squash_onto(
        &self,
        index: &mut gitctx_core::Index,
        source: &str,
        target: &str,
        commits: &[ContextCommit],
        summarizer: &dyn Summarizer,
    ) -> Result<MergeOutcome> {
        let decisions = dedupe_decisions(commits.iter().flat_map(|c| c.decisions.clone()));
        let alternatives =
            dedupe_alternatives(commits.iter().flat_map(|c| c.alternatives.clone()));
        let ota_logs: Vec<OtaLog> = commits.iter().flat_map(|c| c.ota_logs.clone()).collect();
        let messages: Vec<String> = commits.iter().map(|c| c.message.clone()).collect();

        let request = SummarizeRequest {
            branch_name: source,
            commit_messages: &messages,
            decisions: &decisions,
            alternatives: &alternatives,
            ota_logs: &ota_logs,
        };
        let (summary, degraded) = match summarizer.summarize(&request) {
            Ok(summary) => (summary, false),
            Err(e) => {
                warn!(source, error = %e, "summarizer failed; using deterministic fallback");
                (degraded_summary(&request), true)
            }
        };
        let Summary {
            key_insights,
            architecture_summary,
        } = summary;

        let merged_at = now_rfc3339();
        let result = SquashResult {
            decisions,
            rejected_alternatives: alternatives,
            key_insights,
            architecture_summary,
            ota_count: ota_logs.len(),
            original_commits: commits.len(),
            branch_name: source.to_string(),
            merged_at: merged_at.clone(),
        };

        let mut metadata = Metadata::new();
        metadata.insert("squashedFrom".into(), source.into());
        metadata.insert("originalCommits".into(), result.original_commits.into());
        metadata.insert("mergedAt".into(), merged_at.clone().into());
        metadata.insert(
            "keyInsights".into(),
            MetaValue::List(result.key_insights.iter().map(|s| s.as_str().into()).collect()),
        );
        metadata.insert(
            "architectureSummary".into(),
            result.architecture_summary.clone().into(),
        );

        let commit = ContextCommit::build(CommitParts {
            message: format!("Squash merge: {source}"),
            timestamp: merged_at,
            parent: index.branch(target)?.tip().map(String::from),
            decisions: result.decisions.clone(),
            alternatives: result.rejected_alternatives.clone(),
            ota_logs,
            files_snapshot: BTreeMap::new(),
            metadata,
        });

        self.store().write_commit(target, &commit)?;
        index.branch_mut(target)?.record_commit(commit.id.clone());

        Ok(MergeOutcome {
            merged: true,
            commit_id: Some(commit.id),
            replayed: Vec::new(),
            squash: Some(result),
            degraded_summary: degraded,
        })
    }

    /// Full merge: re-home each new source commit onto the target tip, in
    /// original order, payloads verbatim. Ids are re-derived because the
    /// parent changes; provenance is kept in `metadata.replayedFrom`.
    fn replay_onto(
        &self,
        index: &mut gitctx_core::Index,
        source: &str,
        target: &str,
        commits: &[ContextCommit],
    ) -> Result<MergeOutcome> {
        let mut replayed = Vec::with_capacity(commits.len());
        for original in commits {
            let mut metadata = original.metadata.clone();
            metadata.insert("replayedFrom".into(), original.id.clone().into());

            let commit = ContextCommit::build(CommitParts {
                message: original.message.clone(),
                timestamp: original.timestamp.clone(),
                parent: index.branch(target)?.tip().map(String::from),
                decisions: original.decisions.clone(),
                alternatives: original.alternatives.clone(),
                ota_logs: original.ota_logs.clone(),
                files_snapshot: original.files_snapshot.clone(),
                metadata,
            });

            self.store().write_commit(target, &commit)?;
            index.branch_mut(target)?.record_commit(commit.id.clone());
            replayed.push(commit.id);
        }

        Ok(MergeOutcome {
            merged: true,
            commit_id: None,
            replayed,
            squash: None,
            degraded_summary: false,
        })
    }
}

/// Source commits strictly after the recorded merge base, in append order.
fn new_commit_ids(source_commits: &[String], merge_base: Option<&String>) -> Vec<String> {
    let start = merge_base
        .and_then(|base| source_commits.iter().position(|id| id == base))
        .map(|i| i + 1)
        .unwrap_or(0);
    source_commits[start..].to_vec()
}
