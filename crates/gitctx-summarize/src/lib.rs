//! Summarizer collaborator for squash merges.
//!
//! The merge engine hands the aggregated branch history to a [`Summarizer`]
//! and folds the returned insights into the squash commit. A summarizer may
//! fail or be absent; the engine then degrades to [`FallbackSummarizer`]
//! output rather than failing the merge.

use gitctx_core::{Alternative, OtaLog};
use serde::Serialize;
use thiserror::Error;

/// Aggregated branch history handed to a summarizer.
#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest<'a> {
    pub branch_name: &'a str,
    pub commit_messages: &'a [String],
    pub decisions: &'a [String],
    pub alternatives: &'a [Alternative],
    pub ota_logs: &'a [OtaLog],
}

/// What a summarizer contributes to a squash result.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub key_insights: Vec<String>,
    pub architecture_summary: String,
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),
    #[error("summarizer returned an unusable response: {0}")]
    BadResponse(String),
}

/// One-method capability; implementations are selected by configuration.
pub trait Summarizer {
    fn summarize(&self, request: &SummarizeRequest<'_>) -> Result<Summary, SummarizeError>;
}

/// The deterministic degraded summary: joined commit messages, no invented
/// insights. Used directly by the merge engine when a summarizer fails.
pub fn degraded_summary(request: &SummarizeRequest<'_>) -> Summary {
    Summary {
        key_insights: Vec::new(),
        architecture_summary: request.commit_messages.join("; "),
    }
}

/// Deterministic summarizer used when no provider is configured: always
/// returns [`degraded_summary`] output.
#[derive(Debug, Default)]
pub struct FallbackSummarizer;

impl Summarizer for FallbackSummarizer {
    fn summarize(&self, request: &SummarizeRequest<'_>) -> Result<Summary, SummarizeError> {
        Ok(degraded_summary(request))
    }
}

/// Canned summarizer for tests, standing in for a real provider.
#[derive(Debug, Default)]
pub struct MockSummarizer;

impl Summarizer for MockSummarizer {
    fn summarize(&self, request: &SummarizeRequest<'_>) -> Result<Summary, SummarizeError> {
        Ok(Summary {
            key_insights: vec![format!(
                "{} commits on {} distilled",
                request.commit_messages.len(),
                request.branch_name
            )],
            architecture_summary: format!(
                "Branch {} recorded {} decisions across {} OTA logs.",
                request.branch_name,
                request.decisions.len(),
                request.ota_logs.len()
            ),
        })
    }
}

/// A summarizer that always fails. Exercises the engine's degraded path.
#[derive(Debug, Default)]
pub struct UnavailableSummarizer;

impl Summarizer for UnavailableSummarizer {
    fn summarize(&self, _request: &SummarizeRequest<'_>) -> Result<Summary, SummarizeError> {
        Err(SummarizeError::Unavailable("no provider configured".to_string()))
    }
}

/// Which summarizer to run, selected by configuration (never reflection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerKind {
    Fallback,
    Mock,
}

impl SummarizerKind {
    /// `GITCTX_SUMMARIZER` = `fallback` (default) | `mock`.
    pub fn from_env() -> Self {
        match std::env::var("GITCTX_SUMMARIZER").as_deref() {
            Ok("mock") => SummarizerKind::Mock,
            _ => SummarizerKind::Fallback,
        }
    }

    pub fn build(self) -> Box<dyn Summarizer> {
        match self {
            SummarizerKind::Fallback => Box::new(FallbackSummarizer),
            SummarizerKind::Mock => Box::new(MockSummarizer),
        }
    }
}
