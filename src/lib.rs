use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// ─── Log level ────────────────────────────────────────────────────────────────

/// Controls the verbosity of confdiff's internal tracing output.
///
/// Pass to [`init_tracing`] before calling any async entry point.
///
/// | Variant | `tracing` level | When to use                          |
/// |---------|-----------------|--------------------------------------|
/// | `Error` | `error`         | `--quiet` / CI scripting             |
/// | `Info`  | `info`          | Default, shows per-source timings    |
/// | `Debug` | `debug`         | `--verbose`, shows SQL and scripts   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

/// Initialise the global `tracing` subscriber for confdiff.
///
/// Respects `RUST_LOG` when set, falling back to `level` otherwise. Output
/// goes to stderr so that stdout carries only the report.
///
/// Only available when the `cli` feature is enabled (pulls in
/// `tracing-subscriber`).
#[cfg(feature = "cli")]
pub fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let default_filter = match level {
        LogLevel::Error => "confdiff=error",
        LogLevel::Info => "confdiff=info",
        LogLevel::Debug => "confdiff=debug",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

// ─── Public API Facade ───

pub use application::engine::ComparisonEngine;
pub use application::monitoring::PerfReport;
pub use application::projection::{FieldProjector, ProjectionProfile};
pub use application::record_diff::ComparisonMode;
pub use application::sequence::diff_keys;
pub use domain::delta::{Delta, FieldChange};
pub use domain::error::DiffError;
pub use domain::fingerprint::fingerprint;
pub use domain::object_type::{ObjectFilter, ObjectType};
pub use domain::ports::{Connector, Differ, Session};
pub use domain::record::{RawRecord, Record};
pub use domain::report::{ComparisonRun, DiffReport, Summary};
pub use domain::value_objects::{ComparisonKey, ExcludedFields, Fingerprint, Side};
pub use infrastructure::config::{AppConfig, CompareConfig, OutputConfig, SourceConfig};

use crate::application::compare::CompareService;
use crate::application::monitoring::{MonitoringConnector, MonitoringDiffer};
use crate::application::snapshot::SnapshotService;
use crate::infrastructure::build_connector;

// ─── Public entry points ───

/// Compare the configured left and right sources.
///
/// Use [`run_with_timing`] if you also want a performance report.
pub async fn run(cfg: &AppConfig) -> Result<ComparisonRun> {
    let (run, _) = run_with_timing(cfg).await?;
    Ok(run)
}

/// Compare with performance timing: per-side fetch and compare durations.
pub async fn run_with_timing(cfg: &AppConfig) -> Result<(ComparisonRun, PerfReport)> {
    let report = PerfReport::new();
    let profile = ProjectionProfile::resolve(&cfg.compare);

    let left = monitored(&cfg.left, &report);
    let right = monitored(cfg.right_source(), &report);
    let differ = Arc::new(MonitoringDiffer::new(
        Arc::new(ComparisonEngine::new(cfg.compare.comparison)),
        profile.object_type.as_str(),
        Arc::clone(&report),
    ));

    let service = CompareService::new(left, right, differ);
    let run = service.run(&profile).await?;

    Ok((run, PerfReport::snapshot(&report)))
}

/// Write the raw records of one side to `path` as a JSON snapshot.
///
/// Returns the number of records written. Point a `file` source at the
/// snapshot later to compare the live service against it.
pub async fn snapshot(cfg: &AppConfig, side: Side, path: &Path) -> Result<usize> {
    let source = match side {
        Side::Left => &cfg.left,
        Side::Right => cfg.right_source(),
    };
    let profile = ProjectionProfile::resolve(&cfg.compare);
    let svc = SnapshotService::new(build_connector(source));
    svc.capture_to_file(&profile.filter, path).await
}

// ─── Private helpers ───────────────────────────────────────────────────────────

/// Build a connector and wrap it in the monitoring decorator.
///
/// The shared `report` accumulates timings from both sides of one run.
fn monitored(
    source: &SourceConfig,
    report: &Arc<std::sync::Mutex<PerfReport>>,
) -> Arc<dyn Connector> {
    Arc::new(MonitoringConnector::new(
        build_connector(source),
        Arc::clone(report),
    ))
}
