use anyhow::Result;
use sailfish::TemplateOnce;

use crate::domain::{delta::Delta, ports::OutputWriter, report::ComparisonRun};
use crate::presentation::writers::text::render_value;

/// One table row of the HTML report.
struct HtmlRow {
    /// "insert", "delete", "change" or "same"; doubles as the CSS class.
    kind: &'static str,
    symbol: &'static str,
    key: String,
    field: String,
    before: String,
    after: String,
}

#[derive(TemplateOnce)]
#[template(path = "html/report.stpl")] // base dir declared inside sailfish.toml
struct ReportTemplate<'a> {
    run: &'a ComparisonRun,
    rows: Vec<HtmlRow>,
}

fn build_rows(run: &ComparisonRun, show_unchanged: bool) -> Vec<HtmlRow> {
    let mut rows = Vec::new();
    for delta in &run.report.deltas {
        match delta {
            Delta::Insert { key, .. } => rows.push(HtmlRow {
                kind: "insert",
                symbol: "+",
                key: key.to_string(),
                field: String::new(),
                before: String::new(),
                after: String::new(),
            }),
            Delta::Delete { key, .. } => rows.push(HtmlRow {
                kind: "delete",
                symbol: "-",
                key: key.to_string(),
                field: String::new(),
                before: String::new(),
                after: String::new(),
            }),
            Delta::Match { key, changes, .. } if changes.is_empty() => {
                if show_unchanged {
                    rows.push(HtmlRow {
                        kind: "same",
                        symbol: "",
                        key: key.to_string(),
                        field: String::new(),
                        before: String::new(),
                        after: String::new(),
                    });
                }
            }
            Delta::Match { key, changes, .. } => {
                rows.extend(changes.iter().map(|c| HtmlRow {
                    kind: "change",
                    symbol: "~",
                    key: key.to_string(),
                    field: c.field.clone(),
                    before: render_value(c.before.as_ref()),
                    after: render_value(c.after.as_ref()),
                }));
            }
        }
    }
    rows
}

/// Standalone HTML page with the run metadata and one row per report line.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlWriter {
    pub show_unchanged: bool,
}

impl OutputWriter for HtmlWriter {
    fn format(&self, run: &ComparisonRun) -> Result<String> {
        let rows = build_rows(run, self.show_unchanged);
        Ok(ReportTemplate { run, rows }.render_once()?)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
