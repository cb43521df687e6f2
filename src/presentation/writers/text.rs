use anyhow::Result;
use std::fmt::Write as FmtWrite;

use crate::domain::{
    delta::Delta,
    ports::OutputWriter,
    record::FieldValue,
    report::{ComparisonRun, DiffReport},
};

/// Placeholder printed for a field missing on one side.
pub const ABSENT: &str = "<absent>";

/// Line-oriented report: the stable, scriptable output of confdiff.
///
/// ```text
/// - bob
/// ~ carol: role: agent -> supervisor
/// + erin
/// 1 inserted, 1 deleted, 1 changed, 2 unchanged
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TextWriter {
    /// Also print `  <key>` for matched records without changes.
    pub show_unchanged: bool,
}

impl TextWriter {
    pub fn new(show_unchanged: bool) -> Self {
        Self { show_unchanged }
    }

    /// Render a bare report. Identical reports always render identically.
    pub fn render(&self, report: &DiffReport) -> Result<String> {
        let mut out = String::new();

        for delta in &report.deltas {
            match delta {
                Delta::Insert { key, .. } => writeln!(out, "+ {}", render_text(key.as_str()))?,
                Delta::Delete { key, .. } => writeln!(out, "- {}", render_text(key.as_str()))?,
                Delta::Match { key, changes, .. } if changes.is_empty() => {
                    if self.show_unchanged {
                        writeln!(out, "  {}", render_text(key.as_str()))?;
                    }
                }
                Delta::Match { key, changes, .. } => {
                    for c in changes {
                        writeln!(
                            out,
                            "~ {}: {}: {} -> {}",
                            render_text(key.as_str()),
                            render_text(&c.field),
                            render_value(c.before.as_ref()),
                            render_value(c.after.as_ref())
                        )?;
                    }
                }
            }
        }

        writeln!(out, "{}", report.summary)?;
        Ok(out)
    }
}

/// Strings print raw, other values as compact JSON.
pub fn render_value(value: Option<&FieldValue>) -> String {
    match value {
        None => ABSENT.to_string(),
        Some(FieldValue::String(s)) => render_text(s),
        Some(other) => other.to_string(),
    }
}

/// Raw text, or a quoted JSON string when it holds control characters, so
/// that one report entry always stays on one line.
pub fn render_text(s: &str) -> String {
    if s.chars().any(char::is_control) {
        FieldValue::String(s.to_string()).to_string()
    } else {
        s.to_string()
    }
}

impl OutputWriter for TextWriter {
    fn format(&self, run: &ComparisonRun) -> Result<String> {
        self.render(&run.report)
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::delta::FieldChange;
    use serde_json::json;

    fn report() -> DiffReport {
        DiffReport::from_deltas(vec![
            Delta::Match {
                left_pos: 0,
                right_pos: 0,
                key: "alice".into(),
                changes: vec![],
            },
            Delta::Delete {
                pos: 1,
                key: "bob".into(),
            },
            Delta::Match {
                left_pos: 2,
                right_pos: 1,
                key: "carol".into(),
                changes: vec![
                    FieldChange {
                        field: "email".into(),
                        before: None,
                        after: Some(json!("carol@example.com")),
                    },
                    FieldChange {
                        field: "level".into(),
                        before: Some(json!(2)),
                        after: Some(json!(3)),
                    },
                ],
            },
            Delta::Insert {
                pos: 2,
                key: "erin".into(),
            },
        ])
    }

    #[test]
    fn renders_four_line_kinds_and_summary() {
        let out = TextWriter::default().render(&report()).unwrap();
        assert_eq!(
            out,
            "- bob\n\
             ~ carol: email: <absent> -> carol@example.com\n\
             ~ carol: level: 2 -> 3\n\
             + erin\n\
             1 inserted, 1 deleted, 1 changed, 1 unchanged\n"
        );
    }

    #[test]
    fn show_unchanged_lists_matched_keys() {
        let out = TextWriter::new(true).render(&report()).unwrap();
        assert!(out.starts_with("  alice\n- bob\n"), "got: {out}");
    }

    #[test]
    fn empty_report_is_summary_only() {
        let out = TextWriter::default()
            .render(&DiffReport::from_deltas(vec![]))
            .unwrap();
        assert_eq!(out, "0 inserted, 0 deleted, 0 changed, 0 unchanged\n");
    }

    #[test]
    fn values_render_raw_or_as_json() {
        assert_eq!(render_value(None), "<absent>");
        assert_eq!(render_value(Some(&json!("agent"))), "agent");
        assert_eq!(render_value(Some(&json!(null))), "null");
        assert_eq!(render_value(Some(&json!({"a": 1}))), r#"{"a":1}"#);
    }

    #[test]
    fn control_characters_cannot_forge_lines() {
        let report = DiffReport::from_deltas(vec![
            Delta::Match {
                left_pos: 0,
                right_pos: 0,
                key: "bob".into(),
                changes: vec![FieldChange {
                    field: "note".into(),
                    before: Some(json!("ok")),
                    after: Some(json!("x\n+ mallory\n- alice")),
                }],
            },
            Delta::Insert {
                pos: 1,
                key: "eve\r\n- carol".into(),
            },
        ]);
        let out = TextWriter::default().render(&report).unwrap();
        assert_eq!(
            out,
            "~ bob: note: ok -> \"x\\n+ mallory\\n- alice\"\n\
             + \"eve\\r\\n- carol\"\n\
             1 inserted, 0 deleted, 1 changed, 0 unchanged\n"
        );
        assert_eq!(out.lines().count(), 3);
    }
}
