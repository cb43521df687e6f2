use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::value_objects::ComparisonKey;

/// A single field value: string, number, bool, null or a structured value.
pub type FieldValue = Value;

/// Sorted map of field name → value. Iteration order is lexicographic.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A configuration object exactly as the record source returned it.
pub type RawRecord = BTreeMap<String, Value>;

/// Projected configuration object: its comparison key plus the fields
/// selected for deep comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: ComparisonKey,
    pub fields: FieldMap,
}

impl Record {
    pub fn new(key: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            key: ComparisonKey(key.into()),
            fields,
        }
    }

    /// Record with no comparable fields besides its key.
    pub fn key_only(key: impl Into<String>) -> Self {
        Self::new(key, FieldMap::new())
    }
}

