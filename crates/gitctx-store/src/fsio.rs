//! Filesystem primitives: atomic writes and JSON helpers with error context.

use gitctx_core::{ContextError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Atomic write: write to a temp file in the same directory, then rename.
/// A crash mid-write leaves either the old file or the new one, never a
/// torn intermediate.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        ContextError::io(
            "write",
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent directory"),
        )
    })?;
    std::fs::create_dir_all(parent).map_err(|e| ContextError::io("create dir", parent, e))?;
    let mut tmp =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| ContextError::io("write", path, e))?;
    tmp.write_all(data)
        .and_then(|_| tmp.flush())
        .map_err(|e| ContextError::io("write", path, e))?;
    tmp.persist(path)
        .map_err(|e| ContextError::io("rename", path, e.error))?;
    Ok(())
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|e| ContextError::decode("encode", path, e))?;
    write_atomic(path, &json)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| ContextError::io("read", path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| ContextError::decode("decode", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn write_atomic_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.txt");
        write_atomic(&path, b"hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn write_atomic_replaces_existing_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.txt");
        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_atomic_leaves_no_temp_droppings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.txt");
        write_atomic(&path, b"x").unwrap();
        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn json_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.json");
        let mut value = BTreeMap::new();
        value.insert("k".to_string(), 42u32);
        write_json_atomic(&path, &value).unwrap();
        let back: BTreeMap<String, u32> = read_json(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn read_json_reports_path_on_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.json");
        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn read_json_reports_decode_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
