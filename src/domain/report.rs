use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::delta::Delta;
use crate::domain::record::Record;
use crate::domain::value_objects::Fingerprint;

/// Ordered edit script plus its aggregate counts.
///
/// Contains nothing run-specific (no ids, no timestamps) so that identical
/// inputs always render to identical bytes. Run metadata lives in
/// [`ComparisonRun`].
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DiffReport {
    pub deltas: Vec<Delta>,
    pub summary: Summary,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub inserted: usize,
    pub deleted: usize,
    pub changed: usize,
    pub unchanged: usize,
}

impl Summary {
    /// `true` when the two sides are equivalent.
    pub fn is_clean(&self) -> bool {
        self.inserted == 0 && self.deleted == 0 && self.changed == 0
    }

    pub fn total_differences(&self) -> usize {
        self.inserted + self.deleted + self.changed
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inserted, {} deleted, {} changed, {} unchanged",
            self.inserted, self.deleted, self.changed, self.unchanged
        )
    }
}

impl DiffReport {
    /// Aggregate a delta stream. Order is kept exactly as given.
    pub fn from_deltas(deltas: Vec<Delta>) -> Self {
        let mut summary = Summary::default();
        for d in &deltas {
            match d {
                Delta::Insert { .. } => summary.inserted += 1,
                Delta::Delete { .. } => summary.deleted += 1,
                Delta::Match { changes, .. } if changes.is_empty() => summary.unchanged += 1,
                Delta::Match { .. } => summary.changed += 1,
            }
        }
        DiffReport { deltas, summary }
    }

    /// Report for two sides already known to be identical: every record
    /// matches its counterpart at the same position.
    pub fn identity(records: &[Record]) -> Self {
        let deltas = records
            .iter()
            .enumerate()
            .map(|(pos, r)| Delta::Match {
                left_pos: pos,
                right_pos: pos,
                key: r.key.clone(),
                changes: Vec::new(),
            })
            .collect();
        Self::from_deltas(deltas)
    }
}

/// Metadata of one comparison run wrapped around its report.
#[derive(Debug, Serialize, Clone)]
pub struct ComparisonRun {
    pub run_id: String,
    pub created_at: String,
    pub object_type: String,
    pub left_source: String,
    pub right_source: String,
    pub left_fingerprint: Fingerprint,
    pub right_fingerprint: Fingerprint,
    pub left_count: usize,
    pub right_count: usize,
    pub report: DiffReport,
}

/// Labels and fingerprints of both sides, gathered before the run is sealed.
#[derive(Debug, Clone)]
pub struct RunSides {
    pub left_source: String,
    pub right_source: String,
    pub left_fingerprint: Fingerprint,
    pub right_fingerprint: Fingerprint,
    pub left_count: usize,
    pub right_count: usize,
}

impl ComparisonRun {
    pub fn new(object_type: &str, sides: RunSides, report: DiffReport) -> Self {
        ComparisonRun {
            run_id: format!(
                "run_{}_{}",
                Utc::now().format("%Y%m%d_%H%M%S"),
                Uuid::new_v4().simple()
            ),
            created_at: Utc::now().to_rfc3339(),
            object_type: object_type.to_string(),
            left_source: sides.left_source,
            right_source: sides.right_source,
            left_fingerprint: sides.left_fingerprint,
            right_fingerprint: sides.right_fingerprint,
            left_count: sides.left_count,
            right_count: sides.right_count,
            report,
        }
    }
}
