use gitctx_engine::ContextRepo;
use std::path::Path;

pub fn execute(root: &Path, branch: Option<&str>, limit: usize, json: bool) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    let commits = repo.log(branch, limit)?;

    if commits.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }

    if json {
        for commit in &commits {
            println!("{}", serde_json::to_string(commit)?);
        }
        return Ok(());
    }

    for commit in &commits {
        println!("{} {} {}", commit.short_id(), commit.timestamp, commit.message);
        for decision in &commit.decisions {
            println!("    decision: {decision}");
        }
        if !commit.ota_logs.is_empty() {
            println!("    OTA logs: {}", commit.ota_logs.len());
        }
    }
    println!("\n({} commits shown)", commits.len());
    Ok(())
}
