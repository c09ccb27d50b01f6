use gitctx_engine::ContextRepo;
use std::path::Path;

pub fn execute(root: &Path, name: &str) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    repo.switch_branch(name)?;
    println!("Switched to branch {name}");
    Ok(())
}
