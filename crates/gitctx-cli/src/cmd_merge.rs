use gitctx_engine::ContextRepo;
use gitctx_summarize::SummarizerKind;
use std::path::Path;

pub fn execute(root: &Path, branch: &str, into: Option<&str>, squash: bool) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    let summarizer = SummarizerKind::from_env().build();
    let outcome = repo.merge(branch, into, squash, summarizer.as_ref())?;

    let target = match into {
        Some(t) => t.to_string(),
        None => repo.status()?.current_branch,
    };

    if !outcome.merged {
        println!("Nothing to merge: {branch} has no new commits for {target}");
        return Ok(());
    }

    if let Some(squash) = &outcome.squash {
        println!("Merged {branch} -> {target} (squashed)");
        println!("  decisions: {}", squash.decisions.len());
        println!("  rejected: {}", squash.rejected_alternatives.len());
        println!("  insights: {}", squash.key_insights.len());
        println!("  original commits: {} -> summarized", squash.original_commits);
        if outcome.degraded_summary {
            println!("  (summarizer unavailable; deterministic summary used)");
        }
    } else {
        println!(
            "Merged {branch} -> {target} (replayed {} commits)",
            outcome.replayed.len()
        );
    }
    Ok(())
}
