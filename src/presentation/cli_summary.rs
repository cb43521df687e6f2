use crate::application::monitoring::PerfReport;
use crate::domain::report::ComparisonRun;
use colored::*;
use tabled::settings::{object::Columns, Alignment, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SideRow {
    side: String,
    source: String,
    records: String,
    fingerprint: String,
}

#[derive(Tabled)]
struct SummaryRow {
    metric: String,
    value: String,
}

/// Print a coloured overview of a run to stderr, leaving stdout to the report.
pub fn print_summary(run: &ComparisonRun) {
    eprintln!();
    eprintln!("{}", "CONFDIFF SUMMARY".bold().cyan());
    eprintln!(
        "{} → {}  ({})",
        run.left_source.blue(),
        run.right_source.green(),
        run.object_type.bold()
    );
    eprintln!("Run: {}", run.run_id.bright_yellow());
    eprintln!();

    let sides = vec![
        SideRow {
            side: "left".into(),
            source: run.left_source.bold().to_string(),
            records: run.left_count.to_string(),
            fingerprint: short(run.left_fingerprint.as_str()).dimmed().to_string(),
        },
        SideRow {
            side: "right".into(),
            source: run.right_source.bold().to_string(),
            records: run.right_count.to_string(),
            fingerprint: short(run.right_fingerprint.as_str()).dimmed().to_string(),
        },
    ];
    let table = Table::new(sides)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=2)).with(Alignment::right()))
        .to_string();
    eprintln!("{table}");

    let s = &run.report.summary;
    if s.is_clean() {
        eprintln!();
        eprintln!("{}", "✓ No differences, both sides are equivalent.".bold().green());
        eprintln!();
        return;
    }

    let summary_rows = vec![
        SummaryRow {
            metric: "Inserted".into(),
            value: s.inserted.to_string().green().to_string(),
        },
        SummaryRow {
            metric: "Deleted".into(),
            value: s.deleted.to_string().red().to_string(),
        },
        SummaryRow {
            metric: "Changed".into(),
            value: s.changed.to_string().yellow().to_string(),
        },
        SummaryRow {
            metric: "Unchanged".into(),
            value: s.unchanged.to_string().dimmed().to_string(),
        },
    ];

    let summary_table = Table::new(summary_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..=1)).with(Alignment::right()))
        .to_string();

    eprintln!();
    eprintln!("{summary_table}");
    eprintln!();
}

fn short(fp: &str) -> &str {
    fp.get(..12).unwrap_or(fp)
}

// ─── Performance summary ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PerfRow {
    operation: String,
    target: String,
    #[tabled(rename = "records")]
    records: String,
    #[tabled(rename = "time (ms)")]
    duration_ms: String,
}

/// Print a performance timing table to stderr.
pub fn print_perf_summary(report: &PerfReport) {
    if report.timings.is_empty() {
        return;
    }

    eprintln!("{}", "PERFORMANCE".bold().cyan());

    let rows: Vec<PerfRow> = report
        .timings
        .iter()
        .map(|t| PerfRow {
            operation: t.operation.dimmed().to_string(),
            target: t.target.bold().to_string(),
            records: t.records.to_string(),
            duration_ms: format_duration(t.duration_ms),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=3)).with(Alignment::right()))
        .to_string();

    eprintln!("{table}");

    eprintln!(
        "  Total: {} record(s) fetched  ·  {} ms elapsed",
        report.total_records_fetched.to_string().bold(),
        format_duration(report.total_ms),
    );
    eprintln!();
}

fn format_duration(ms: u128) -> String {
    if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0).yellow().to_string()
    } else if ms >= 100 {
        ms.to_string().yellow().to_string()
    } else {
        ms.to_string().green().to_string()
    }
}
