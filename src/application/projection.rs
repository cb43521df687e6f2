use serde_json::Value;

use crate::domain::{
    error::DiffError,
    object_type::{ObjectFilter, ObjectType},
    record::{FieldMap, RawRecord, Record},
    value_objects::{ExcludedFields, Side},
};
use crate::infrastructure::config::CompareConfig;

/// Allow-list entry selecting every field of the raw record.
pub const ALL_FIELDS: &str = "*";

// ─── Projection profile ───

/// Per-object-type projection strategy, resolved once per invocation.
///
/// Holds everything needed to turn raw records into [`Record`]s and to ask a
/// session for the right objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionProfile {
    pub object_type: ObjectType,
    pub key_field: String,
    /// Fields kept for deep comparison. Defaults to the key field alone.
    pub fields: Vec<String>,
    pub excluded: ExcludedFields,
    pub filter: ObjectFilter,
}

impl ProjectionProfile {
    /// Built-in defaults for `object_type`: key-only comparison.
    pub fn for_type(object_type: ObjectType) -> Self {
        let key_field = object_type.default_key_field().to_string();
        Self {
            object_type,
            fields: vec![key_field.clone()],
            key_field,
            excluded: ExcludedFields::default(),
            filter: ObjectFilter::for_type(object_type),
        }
    }

    /// Apply the `[compare]` overrides on top of the type defaults.
    pub fn resolve(cfg: &CompareConfig) -> Self {
        let mut profile = Self::for_type(cfg.object_type);
        if let Some(key_field) = &cfg.key_field {
            profile.key_field = key_field.clone();
        }
        profile.fields = if cfg.fields.is_empty() {
            vec![profile.key_field.clone()]
        } else {
            cfg.fields.clone()
        };
        profile.excluded = cfg.excluded_fields.clone();
        if let Some(table) = &cfg.table {
            profile.filter.table = table.clone();
        }
        profile.filter.criteria.extend(cfg.criteria.clone());
        profile.filter.order_by = cfg.order_by.clone();
        profile
    }

    pub fn projector(&self) -> FieldProjector<'_> {
        FieldProjector { profile: self }
    }
}

// ─── Field projector ───

/// Maps raw records to comparison records. Pure: the same raw record always
/// yields the same [`Record`].
pub struct FieldProjector<'a> {
    profile: &'a ProjectionProfile,
}

impl FieldProjector<'_> {
    /// Project one raw record found at `position` on `side`.
    pub fn project(&self, raw: &RawRecord, side: Side, position: usize) -> Result<Record, DiffError> {
        let key = self.extract_key(raw, side, position)?;
        Ok(Record::new(key, self.select_fields(raw)))
    }

    /// Project a whole sequence in order, failing on the first bad record.
    pub fn project_all(&self, raws: &[RawRecord], side: Side) -> Result<Vec<Record>, DiffError> {
        raws.iter()
            .enumerate()
            .map(|(pos, raw)| self.project(raw, side, pos))
            .collect()
    }

    fn extract_key(&self, raw: &RawRecord, side: Side, position: usize) -> Result<String, DiffError> {
        let field = &self.profile.key_field;
        let key = match raw.get(field) {
            None => {
                return Err(DiffError::projection(
                    side,
                    position,
                    format!("key field '{field}' is absent"),
                ))
            }
            Some(Value::Null) => {
                return Err(DiffError::projection(
                    side,
                    position,
                    format!("key field '{field}' is null"),
                ))
            }
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(_) => {
                return Err(DiffError::projection(
                    side,
                    position,
                    format!("key field '{field}' is not a scalar"),
                ))
            }
        };

        if key.trim().is_empty() {
            return Err(DiffError::projection(
                side,
                position,
                format!("key field '{field}' is empty"),
            ));
        }
        Ok(key)
    }

    fn select_fields(&self, raw: &RawRecord) -> FieldMap {
        let all = self.profile.fields.iter().any(|f| f == ALL_FIELDS);
        raw.iter()
            .filter(|(name, _)| all || self.profile.fields.iter().any(|f| f == *name))
            .filter(|(name, _)| !self.profile.excluded.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, Value)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn agent_profile(fields: &[&str]) -> ProjectionProfile {
        let mut p = ProjectionProfile::for_type(ObjectType::Agent);
        p.fields = fields.iter().map(|f| f.to_string()).collect();
        p
    }

    #[test]
    fn default_profile_is_key_only() {
        let profile = ProjectionProfile::for_type(ObjectType::Agent);
        let rec = profile
            .projector()
            .project(
                &raw(&[("user_name", json!("alice")), ("role", json!("agent"))]),
                Side::Left,
                0,
            )
            .unwrap();
        assert_eq!(rec.key.as_str(), "alice");
        assert_eq!(rec.fields.len(), 1);
        assert_eq!(rec.fields["user_name"], json!("alice"));
    }

    #[test]
    fn selected_fields_only() {
        let profile = agent_profile(&["role", "email"]);
        let rec = profile
            .projector()
            .project(
                &raw(&[
                    ("user_name", json!("bob")),
                    ("role", json!("agent")),
                    ("db_id", json!(42)),
                ]),
                Side::Right,
                3,
            )
            .unwrap();
        assert_eq!(rec.key.as_str(), "bob");
        assert_eq!(rec.fields.keys().collect::<Vec<_>>(), vec!["role"]);
    }

    #[test]
    fn wildcard_with_exclusions() {
        let mut profile = agent_profile(&[ALL_FIELDS]);
        profile.excluded = ExcludedFields(vec!["db_id".into()]);
        let rec = profile
            .projector()
            .project(
                &raw(&[
                    ("user_name", json!("bob")),
                    ("role", json!("agent")),
                    ("db_id", json!(42)),
                ]),
                Side::Left,
                0,
            )
            .unwrap();
        assert_eq!(
            rec.fields.keys().collect::<Vec<_>>(),
            vec!["role", "user_name"]
        );
    }

    #[test]
    fn numeric_key_is_stringified() {
        let mut profile = ProjectionProfile::for_type(ObjectType::Skill);
        profile.key_field = "dbid".into();
        let rec = profile
            .projector()
            .project(&raw(&[("dbid", json!(101))]), Side::Left, 0)
            .unwrap();
        assert_eq!(rec.key.as_str(), "101");
    }

    #[test]
    fn missing_key_is_a_projection_error() {
        let profile = ProjectionProfile::for_type(ObjectType::Agent);
        let err = profile
            .projector()
            .project(&raw(&[("role", json!("agent"))]), Side::Left, 7)
            .unwrap_err();
        assert_eq!(
            err,
            DiffError::projection(Side::Left, 7, "key field 'user_name' is absent")
        );
    }

    #[test]
    fn empty_or_blank_key_is_a_projection_error() {
        let profile = ProjectionProfile::for_type(ObjectType::Agent);
        for bad in [json!(""), json!("   "), Value::Null, json!(["a"])] {
            let err = profile
                .projector()
                .project(&raw(&[("user_name", bad.clone())]), Side::Right, 1)
                .unwrap_err();
            assert!(
                matches!(err, DiffError::Projection { side: Side::Right, position: 1, .. }),
                "value {bad} gave {err:?}"
            );
        }
    }

    #[test]
    fn project_all_reports_first_bad_position() {
        let profile = ProjectionProfile::for_type(ObjectType::Agent);
        let raws = vec![
            raw(&[("user_name", json!("alice"))]),
            raw(&[("user_name", json!("bob"))]),
            raw(&[("user_name", json!(""))]),
            raw(&[]),
        ];
        let err = profile.projector().project_all(&raws, Side::Left).unwrap_err();
        assert!(matches!(err, DiffError::Projection { position: 2, .. }));
    }

    #[test]
    fn project_all_preserves_order() {
        let profile = ProjectionProfile::for_type(ObjectType::Agent);
        let raws: Vec<RawRecord> = ["carol", "alice", "bob"]
            .iter()
            .map(|n| raw(&[("user_name", json!(n))]))
            .collect();
        let recs = profile.projector().project_all(&raws, Side::Left).unwrap();
        let keys: Vec<&str> = recs.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn resolve_applies_overrides() {
        let cfg = CompareConfig {
            object_type: ObjectType::Agent,
            key_field: Some("employee_id".into()),
            fields: vec!["role".into()],
            table: Some("persons_view".into()),
            order_by: Some("dbid".into()),
            ..CompareConfig::default()
        };
        let p = ProjectionProfile::resolve(&cfg);
        assert_eq!(p.key_field, "employee_id");
        assert_eq!(p.fields, vec!["role".to_string()]);
        assert_eq!(p.filter.table, "persons_view");
        assert_eq!(p.filter.order_by.as_deref(), Some("dbid"));
        assert_eq!(p.filter.criteria["is_agent"], json!(true));
    }

    #[test]
    fn resolve_defaults_fields_to_key_override() {
        let cfg = CompareConfig {
            key_field: Some("employee_id".into()),
            ..CompareConfig::default()
        };
        let p = ProjectionProfile::resolve(&cfg);
        assert_eq!(p.fields, vec!["employee_id".to_string()]);
    }
}
