use tracing::debug;

use crate::application::record_diff::{compare_fields, comparator_for, ComparisonMode};
use crate::application::sequence::{diff_keys, replay};
use crate::domain::{
    delta::Delta,
    error::DiffError,
    ports::{Differ, FieldComparator},
    record::Record,
    report::DiffReport,
    value_objects::ComparisonKey,
};

/// The comparison engine: key alignment, field comparison for matched
/// pairs, script validation and aggregation.
///
/// Pure and single-threaded; one instance can serve any number of runs.
pub struct ComparisonEngine {
    comparator: Box<dyn FieldComparator>,
}

impl Default for ComparisonEngine {
    fn default() -> Self {
        Self::new(ComparisonMode::Exact)
    }
}

impl ComparisonEngine {
    pub fn new(mode: ComparisonMode) -> Self {
        Self {
            comparator: comparator_for(mode),
        }
    }

    pub fn with_comparator(comparator: Box<dyn FieldComparator>) -> Self {
        Self { comparator }
    }
}

impl Differ for ComparisonEngine {
    fn compare(&self, left: &[Record], right: &[Record]) -> Result<DiffReport, DiffError> {
        let left_keys: Vec<ComparisonKey> = left.iter().map(|r| r.key.clone()).collect();
        let right_keys: Vec<ComparisonKey> = right.iter().map(|r| r.key.clone()).collect();

        let mut deltas = diff_keys(&left_keys, &right_keys);
        validate_script(&left_keys, &right_keys, &deltas)?;

        for delta in &mut deltas {
            if let Delta::Match {
                left_pos,
                right_pos,
                changes,
                ..
            } = delta
            {
                *changes = compare_fields(&left[*left_pos], &right[*right_pos], self.comparator.as_ref());
            }
        }

        let report = DiffReport::from_deltas(deltas);
        debug!(
            left = left.len(),
            right = right.len(),
            inserted = report.summary.inserted,
            deleted = report.summary.deleted,
            changed = report.summary.changed,
            "comparison completed"
        );
        Ok(report)
    }
}

/// Check that every delta references a valid position and that replaying
/// the script over `left` yields exactly `right`.
pub fn validate_script(
    left: &[ComparisonKey],
    right: &[ComparisonKey],
    deltas: &[Delta],
) -> Result<(), DiffError> {
    for d in deltas {
        let in_range = match d {
            Delta::Insert { pos, .. } => *pos < right.len(),
            Delta::Delete { pos, .. } => *pos < left.len(),
            Delta::Match {
                left_pos,
                right_pos,
                ..
            } => *left_pos < left.len() && *right_pos < right.len(),
        };
        if !in_range {
            return Err(DiffError::invariant(format!(
                "delta {d:?} is outside the input sequences ({} left, {} right)",
                left.len(),
                right.len()
            )));
        }
    }

    match replay(left, deltas) {
        Some(rebuilt) if rebuilt.as_slice() == right => Ok(()),
        Some(_) => Err(DiffError::invariant(
            "replaying the edit script does not reproduce the right sequence",
        )),
        None => Err(DiffError::invariant(
            "edit script positions are inconsistent with the left sequence",
        )),
    }
}
