use gitctx_engine::ContextRepo;
use std::path::Path;

pub fn create(root: &Path, name: &str, from: Option<&str>) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    repo.create_branch(name, from)?;
    let source = match from {
        Some(s) => s.to_string(),
        None => repo.status()?.current_branch,
    };
    println!("Created branch {name} from {source}");
    Ok(())
}

pub fn delete(root: &Path, name: &str) -> anyhow::Result<()> {
    let repo = ContextRepo::open_from(root)?;
    repo.delete_branch(name)?;
    println!("Deleted branch {name} (history archived)");
    Ok(())
}
