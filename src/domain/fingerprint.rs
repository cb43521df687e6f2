use sha2::{Digest, Sha256};

use crate::domain::record::Record;
use crate::domain::value_objects::Fingerprint;

/// Compute a SHA-256 fingerprint of a projected sequence.
///
/// Algorithm:
/// 1. Each record is serialised to a **canonical** JSON string (field names
///    sorted, as `FieldMap` is a `BTreeMap`).
/// 2. Record strings are joined with `\n` in sequence order and hashed.
///
/// Unlike a set fingerprint, order matters here: retrieval order is part of
/// what the engine compares. An empty sequence produces a well-defined
/// fingerprint (hash of empty string).
pub fn fingerprint(records: &[Record]) -> Fingerprint {
    let content = records
        .iter()
        .map(|r| serde_json::to_string(r).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");
    let hash = Sha256::digest(content.as_bytes());
    Fingerprint(format!("{:x}", hash))
}
