//! Content hashing and deterministic commit-id derivation.

use crate::ota::OtaLog;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Length of a commit id in hex characters.
pub const COMMIT_ID_LEN: usize = 12;

/// Compute SHA-256 hash of bytes, returning lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Derive a commit id from its identity-bearing parts: parent id, message,
/// timestamp, and the serialized staged logs. Identical inputs always yield
/// the same id, so ids are reproducible and collisions are content collisions.
pub fn derive_commit_id(
    parent: Option<&str>,
    message: &str,
    timestamp: &str,
    ota_logs: &[OtaLog],
) -> String {
    let identity = serde_json::json!({
        "parent": parent,
        "message": message,
        "timestamp": timestamp,
        "ota_logs": ota_logs,
    });
    let mut id = sha256_hex(&canonical_bytes(&identity));
    id.truncate(COMMIT_ID_LEN);
    id
}

/// Canonical JSON bytes: object keys sorted lexicographically (recursive),
/// arrays preserve order, no extra whitespace.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    let sorted = sort_value(value);
    serde_json::to_vec(&sorted).expect("canonical JSON serialization should not fail")
}

fn sort_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(&String, Value)> =
                map.iter().map(|(k, v)| (k, sort_value(v))).collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(pairs.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        other => other.clone(),
    }
}
