use gitctx_engine::ContextRepo;
use std::path::Path;

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let repo = ContextRepo::init(root)?;
    println!(
        "Initialized empty gitctx repository at {}",
        repo.store().paths.context_dir.display()
    );
    Ok(())
}
