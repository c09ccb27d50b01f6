use gitctx_engine::ContextRepo;
use std::path::Path;

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    let status = repo.status()?;

    println!("On branch {}", status.current_branch);
    match (&status.latest_commit_id, &status.latest_commit_message) {
        (Some(id), Some(message)) => println!("Last commit: {} \"{message}\"", &id[..8.min(id.len())]),
        _ => println!("Last commit: (none)"),
    }
    println!("Commits: {}", status.commits);
    println!(
        "Staged logs: {}",
        if status.uncommitted_changes { "yes" } else { "no" }
    );
    println!("Branches: {}", status.all_branches.join(", "));
    Ok(())
}
