use crate::domain::{
    error::DiffError,
    object_type::ObjectFilter,
    record::{FieldValue, RawRecord, Record},
    report::{ComparisonRun, DiffReport},
};
use anyhow::Result;
use async_trait::async_trait;

/// Port: opens authenticated sessions against one configuration source
/// (implemented by `SqlConnector` and `FileConnector`).
#[async_trait]
pub trait Connector: Send + Sync {
    /// Human-readable label used in logs, errors and reports.
    fn name(&self) -> &str;

    async fn open(&self) -> Result<Box<dyn Session>, DiffError>;
}

/// Port: one open session. Must be released on every exit path; see
/// `application::extract::fetch_scoped`.
#[async_trait]
pub trait Session: Send + Sync {
    /// Retrieve the objects selected by `filter`, in source order.
    async fn fetch(&self, filter: &ObjectFilter) -> Result<Vec<RawRecord>, DiffError>;

    async fn release(self: Box<Self>) -> Result<(), DiffError>;
}

/// Port: comparison of two projected sequences (implemented by `ComparisonEngine`).
pub trait Differ: Send + Sync {
    fn compare(&self, left: &[Record], right: &[Record]) -> Result<DiffReport, DiffError>;

    /// Report for two sides with equal fingerprints; no alignment needed.
    fn identity(&self, records: &[Record]) -> DiffReport {
        DiffReport::identity(records)
    }
}

/// Port: equality used by the record differencer.
pub trait FieldComparator: Send + Sync {
    fn equal(&self, left: &FieldValue, right: &FieldValue) -> bool;
}

/// Port: output formatting (implemented by TextWriter, JsonWriter, HtmlWriter)
pub trait OutputWriter: Send + Sync {
    /// Serializes the run to a string (text, JSON, HTML)
    fn format(&self, run: &ComparisonRun) -> Result<String>;
    /// Extension of the produced file (e.g. "txt", "json", "html")
    fn extension(&self) -> &'static str;
}
