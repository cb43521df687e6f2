use serde::Serialize;

use crate::domain::record::FieldValue;
use crate::domain::value_objects::ComparisonKey;

/// One atomic entry of an edit script.
///
/// Positions are zero-based: `Delete::pos` indexes the left sequence,
/// `Insert::pos` indexes the right sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Delta {
    Insert {
        pos: usize,
        key: ComparisonKey,
    },
    Delete {
        pos: usize,
        key: ComparisonKey,
    },
    Match {
        left_pos: usize,
        right_pos: usize,
        key: ComparisonKey,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        changes: Vec<FieldChange>,
    },
}

/// A single field-level difference inside a matched pair.
///
/// `None` means the field is absent on that side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub before: Option<FieldValue>,
    pub after: Option<FieldValue>,
}
