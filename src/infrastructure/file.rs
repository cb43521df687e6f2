use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::application::snapshot::read_snapshot;
use crate::domain::error::DiffError;
use crate::domain::object_type::ObjectFilter;
use crate::domain::ports::{Connector, Session};
use crate::domain::record::RawRecord;

/// Serves records from a JSON snapshot file written by `confdiff snapshot`.
///
/// The file is read when the session opens; criteria are evaluated in
/// memory and file order is kept.
pub struct FileConnector {
    path: PathBuf,
    name: String,
}

impl FileConnector {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

struct FileSession {
    records: Vec<RawRecord>,
}

#[async_trait]
impl Connector for FileConnector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> Result<Box<dyn Session>, DiffError> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || read_snapshot(&path))
            .await
            .map_err(|e| DiffError::retrieval(&self.name, e))?
            .map_err(|e| DiffError::retrieval(&self.name, e))?;
        debug!(source = %self.name, records = records.len(), "snapshot loaded");
        Ok(Box::new(FileSession { records }))
    }
}

#[async_trait]
impl Session for FileSession {
    async fn fetch(&self, filter: &ObjectFilter) -> Result<Vec<RawRecord>, DiffError> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn release(self: Box<Self>) -> Result<(), DiffError> {
        Ok(())
    }
}
