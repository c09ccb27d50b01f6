use gitctx_core::Alternative;
use gitctx_engine::{CommitOptions, ContextRepo};
use std::collections::BTreeMap;
use std::path::Path;

/// Parse a rejected alternative given as `what=why`.
fn parse_alternative(s: &str) -> anyhow::Result<Alternative> {
    match s.split_once('=') {
        Some((what, why)) if !what.is_empty() => Ok(Alternative::new(what.trim(), why.trim())),
        _ => anyhow::bail!("invalid alternative: {s:?} (expected \"what=why\")"),
    }
}

fn read_snapshot(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn execute(
    root: &Path,
    message: &str,
    decisions: Vec<String>,
    alternatives: &[String],
    snapshot: Option<&Path>,
) -> anyhow::Result<()> {
    let alternatives = alternatives
        .iter()
        .map(|s| parse_alternative(s))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let files_snapshot = match snapshot {
        Some(path) => read_snapshot(path)?,
        None => BTreeMap::new(),
    };

    let repo = ContextRepo::open_from(root)?;
    let commit = repo.commit(
        message,
        CommitOptions {
            decisions,
            alternatives,
            files_snapshot,
            ..Default::default()
        },
    )?;

    println!("Committed {} \"{message}\"", commit.short_id());
    if !commit.decisions.is_empty() {
        println!("  decisions: {}", commit.decisions.len());
    }
    if !commit.ota_logs.is_empty() {
        println!("  OTA logs: {}", commit.ota_logs.len());
    }
    Ok(())
}
