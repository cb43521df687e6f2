use anyhow::Result;

use crate::domain::{ports::OutputWriter, report::ComparisonRun};

/// Pretty-printed JSON of the whole run, report nested under `report`.
pub struct JsonWriter;

impl OutputWriter for JsonWriter {
    fn format(&self, run: &ComparisonRun) -> Result<String> {
        Ok(serde_json::to_string_pretty(run)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::delta::{Delta, FieldChange};
    use crate::domain::report::{DiffReport, RunSides};
    use crate::domain::value_objects::Fingerprint;
    use serde_json::{json, Value};

    fn make_run() -> ComparisonRun {
        let report = DiffReport::from_deltas(vec![
            Delta::Delete {
                pos: 0,
                key: "bob".into(),
            },
            Delta::Match {
                left_pos: 1,
                right_pos: 0,
                key: "carol".into(),
                changes: vec![FieldChange {
                    field: "role".into(),
                    before: Some(json!("agent")),
                    after: None,
                }],
            },
        ]);
        ComparisonRun::new(
            "agent",
            RunSides {
                left_source: "prod".into(),
                right_source: "staging".into(),
                left_fingerprint: Fingerprint("aa".into()),
                right_fingerprint: Fingerprint("bb".into()),
                left_count: 2,
                right_count: 1,
            },
            report,
        )
    }

    #[test]
    fn json_output_tags_each_delta() {
        let output = JsonWriter.format(&make_run()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["object_type"], "agent");
        assert_eq!(parsed["left_source"], "prod");
        let deltas = &parsed["report"]["deltas"];
        assert_eq!(deltas[0]["op"], "delete");
        assert_eq!(deltas[0]["key"], "bob");
        assert_eq!(deltas[1]["op"], "match");
        assert_eq!(deltas[1]["changes"][0]["field"], "role");
        assert_eq!(deltas[1]["changes"][0]["after"], Value::Null);
        assert_eq!(parsed["report"]["summary"]["deleted"], 1);
        assert_eq!(parsed["report"]["summary"]["changed"], 1);
    }

    #[test]
    fn unchanged_match_omits_changes() {
        let run = ComparisonRun {
            report: DiffReport::from_deltas(vec![Delta::Match {
                left_pos: 0,
                right_pos: 0,
                key: "alice".into(),
                changes: vec![],
            }]),
            ..make_run()
        };
        let parsed: Value = serde_json::from_str(&JsonWriter.format(&run).unwrap()).unwrap();
        assert!(parsed["report"]["deltas"][0].get("changes").is_none());
    }
}
