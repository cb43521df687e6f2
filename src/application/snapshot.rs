use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::application::extract::fetch_scoped;
use crate::domain::object_type::ObjectFilter;
use crate::domain::ports::Connector;
use crate::domain::record::RawRecord;

// ─────────────────────────────────────────────────────────────────────────────
// SnapshotService
// ─────────────────────────────────────────────────────────────────────────────

/// Captures the raw records of one source as a point-in-time snapshot.
///
/// The snapshot is a JSON array in retrieval order. Point a `file` source at
/// it later to detect drift against the live service.
pub struct SnapshotService {
    connector: Arc<dyn Connector>,
}

impl SnapshotService {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Fetch the raw records selected by `filter`, unprojected.
    pub async fn capture(&self, filter: &ObjectFilter) -> Result<Vec<RawRecord>> {
        Ok(fetch_scoped(self.connector.as_ref(), filter).await?)
    }

    /// Capture and write the snapshot to `path`, creating parent directories.
    pub async fn capture_to_file(&self, filter: &ObjectFilter, path: &Path) -> Result<usize> {
        let records = self.capture(filter).await?;
        write_snapshot(path, &records)?;
        info!(
            source = self.connector.name(),
            records = records.len(),
            path = %path.display(),
            "snapshot written"
        );
        Ok(records.len())
    }
}

pub fn write_snapshot(path: &Path, records: &[RawRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Snapshot {} is not a JSON array of objects", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_round_trips_through_disk_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("agents.json");
        let records: Vec<RawRecord> = ["carol", "alice"]
            .iter()
            .map(|n| [("user_name".to_string(), json!(n))].into())
            .collect();

        write_snapshot(&path, &records).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), records);
    }

    #[test]
    fn read_snapshot_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"user_name": "alice"}"#).unwrap();
        let err = read_snapshot(&path).unwrap_err();
        assert!(format!("{err:#}").contains("JSON array"));
    }
}
