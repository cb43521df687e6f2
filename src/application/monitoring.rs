use crate::domain::ports::{Connector, Differ, Session};
use crate::domain::{
    error::DiffError,
    object_type::ObjectFilter,
    record::{RawRecord, Record},
    report::DiffReport,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, instrument};

// ─── PerfReport ──────────────────────────────────────────────────────────────

/// A single timed operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OpTiming {
    /// Operation name: "fetch" or "compare".
    pub operation: &'static str,
    /// Source (for fetch) or object type (for compare) the operation ran on.
    pub target: String,
    /// Elapsed wall time in milliseconds.
    pub duration_ms: u128,
    /// Number of records involved (fetched or compared).
    pub records: usize,
}

/// Accumulated performance timings for a single confdiff run.
///
/// Shared across all decorator instances for one run via `Arc<Mutex<_>>`.
/// After the run, pass to [`crate::presentation::cli_summary::print_perf_summary`]
/// to render a human-readable table.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct PerfReport {
    pub timings: Vec<OpTiming>,
    pub total_records_fetched: usize,
    pub total_ms: u128,
}

impl PerfReport {
    pub fn new() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Copy of the report accumulated so far.
    pub fn snapshot(report: &Arc<Mutex<Self>>) -> Self {
        report.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(report: &Arc<Mutex<Self>>, timing: OpTiming) {
        if let Ok(mut r) = report.lock() {
            r.total_ms += timing.duration_ms;
            if timing.operation == "fetch" {
                r.total_records_fetched += timing.records;
            }
            r.timings.push(timing);
        }
    }
}

// ─── MonitoringConnector ─────────────────────────────────────────────────────

/// Decorator: wraps any `Connector` so that each session it opens measures
/// wall time per `fetch` call and appends it to the shared `PerfReport`.
pub struct MonitoringConnector {
    inner: Arc<dyn Connector>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringConnector {
    pub fn new(inner: Arc<dyn Connector>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

#[async_trait]
impl Connector for MonitoringConnector {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn open(&self) -> Result<Box<dyn Session>, DiffError> {
        let session = self.inner.open().await?;
        Ok(Box::new(MonitoringSession {
            inner: session,
            source: self.inner.name().to_string(),
            report: Arc::clone(&self.report),
        }))
    }
}

struct MonitoringSession {
    inner: Box<dyn Session>,
    source: String,
    report: Arc<Mutex<PerfReport>>,
}

#[async_trait]
impl Session for MonitoringSession {
    #[instrument(
        name = "fetch",
        skip(self, filter),
        fields(source = %self.source, object_type = %filter.object_type),
        level = "info"
    )]
    async fn fetch(&self, filter: &ObjectFilter) -> Result<Vec<RawRecord>, DiffError> {
        let start = Instant::now();
        let records = self.inner.fetch(filter).await?;
        let duration_ms = start.elapsed().as_millis();

        info!(source = %self.source, records = records.len(), duration_ms, "fetch completed");

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "fetch",
                target: self.source.clone(),
                duration_ms,
                records: records.len(),
            },
        );

        Ok(records)
    }

    async fn release(self: Box<Self>) -> Result<(), DiffError> {
        self.inner.release().await
    }
}

// ─── MonitoringDiffer ────────────────────────────────────────────────────────

/// Decorator: wraps any `Differ`, measures wall time per `compare` call,
/// and appends the result to the shared `PerfReport`.
pub struct MonitoringDiffer {
    inner: Arc<dyn Differ>,
    label: String,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringDiffer {
    pub fn new(inner: Arc<dyn Differ>, label: impl Into<String>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self {
            inner,
            label: label.into(),
            report,
        }
    }
}

impl Differ for MonitoringDiffer {
    #[instrument(
        name = "compare",
        skip(self, left, right),
        fields(object_type = %self.label, left.records = left.len(), right.records = right.len()),
        level = "info"
    )]
    fn compare(&self, left: &[Record], right: &[Record]) -> Result<DiffReport, DiffError> {
        let start = Instant::now();
        let result = self.inner.compare(left, right)?;
        let duration_ms = start.elapsed().as_millis();

        info!(
            object_type = %self.label,
            left_records = left.len(),
            right_records = right.len(),
            differences = result.summary.total_differences(),
            duration_ms,
            "compare completed"
        );

        self.record_compare(duration_ms, left.len() + right.len());
        Ok(result)
    }

    fn identity(&self, records: &[Record]) -> DiffReport {
        let start = Instant::now();
        let result = self.inner.identity(records);
        let duration_ms = start.elapsed().as_millis();

        info!(object_type = %self.label, records = records.len(), duration_ms, fast_path = true, "compare completed");

        self.record_compare(duration_ms, records.len() * 2);
        result
    }
}

impl MonitoringDiffer {
    fn record_compare(&self, duration_ms: u128, records: usize) {
        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "compare",
                target: self.label.clone(),
                duration_ms,
                records,
            },
        );
    }
}
