//! The staging area: OTA logs recorded since the last commit.
//!
//! One JSON file per staged log under `temp/ota_<id>.json`. Listing sorts
//! by id; ids are ULIDs, so id order is chronological order. Only a
//! successful commit (or an explicit discard) clears the area.

use crate::fsio;
use crate::paths::RepoPaths;
use gitctx_core::{ContextError, OtaLog, Result};

const STAGED_PREFIX: &str = "ota_";
const STAGED_SUFFIX: &str = ".json";

/// Persist one staged log. Append-only; never touches other entries.
pub fn append_staged_log(paths: &RepoPaths, log: &OtaLog) -> Result<()> {
    fsio::write_json_atomic(&paths.staged_log_file(&log.id), log)
}

/// All staged logs in chronological (id) order.
pub fn list_staged_logs(paths: &RepoPaths) -> Result<Vec<OtaLog>> {
    let mut files = staged_files(paths)?;
    files.sort();
    files
        .iter()
        .map(|path| fsio::read_json(path))
        .collect()
}

/// Number of staged logs, without parsing them.
pub fn staged_count(paths: &RepoPaths) -> Result<usize> {
    Ok(staged_files(paths)?.len())
}

/// Remove every staged log. Called only after a commit is durably written.
pub fn clear_staged_logs(paths: &RepoPaths) -> Result<()> {
    for path in staged_files(paths)? {
        std::fs::remove_file(&path).map_err(|e| ContextError::io("remove staged log", &path, e))?;
    }
    Ok(())
}

fn staged_files(paths: &RepoPaths) -> Result<Vec<std::path::PathBuf>> {
    if !paths.temp_dir.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(&paths.temp_dir)
        .map_err(|e| ContextError::io("read staging dir", &paths.temp_dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ContextError::io("read staging dir", &paths.temp_dir, e))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(STAGED_PREFIX) && name.ends_with(STAGED_SUFFIX) {
            files.push(entry.path());
        }
    }
    Ok(files)
}
