use gitctx_engine::ContextRepo;
use std::path::Path;

pub fn execute(
    root: &Path,
    thought: &str,
    action: &str,
    result: &str,
    files: Vec<String>,
) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    let log = repo.stage_log(thought, action, result, files)?;
    let staged = repo.store().staged_count()?;
    println!("Staged OTA log {} ({staged} pending)", log.id);
    Ok(())
}

pub fn discard(root: &Path) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    let dropped = repo.discard_staged()?;
    println!("Discarded {dropped} staged log(s)");
    Ok(())
}
