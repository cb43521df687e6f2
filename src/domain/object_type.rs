use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::domain::record::RawRecord;

/// Kind of configuration object being compared.
///
/// Resolved once per invocation; it decides the default key field, the
/// default source table and the retrieval criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Person,
    #[default]
    Agent,
    AgentGroup,
    Skill,
    Place,
}

impl ObjectType {
    pub const ALL: [ObjectType; 5] = [
        ObjectType::Person,
        ObjectType::Agent,
        ObjectType::AgentGroup,
        ObjectType::Skill,
        ObjectType::Place,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Person => "person",
            ObjectType::Agent => "agent",
            ObjectType::AgentGroup => "agent_group",
            ObjectType::Skill => "skill",
            ObjectType::Place => "place",
        }
    }

    /// Field holding the object's identity in the configuration service.
    pub fn default_key_field(&self) -> &'static str {
        match self {
            ObjectType::Person | ObjectType::Agent => "user_name",
            _ => "name",
        }
    }

    /// Table (or collection) the object type is stored in.
    pub fn default_table(&self) -> &'static str {
        match self {
            // agents are persons flagged as such
            ObjectType::Person | ObjectType::Agent => "cfg_person",
            ObjectType::AgentGroup => "cfg_agent_group",
            ObjectType::Skill => "cfg_skill",
            ObjectType::Place => "cfg_place",
        }
    }

    /// Equality criteria every retrieved object must satisfy.
    pub fn default_criteria(&self) -> BTreeMap<String, Value> {
        let mut criteria = BTreeMap::new();
        if let ObjectType::Agent = self {
            criteria.insert("is_agent".to_string(), Value::Bool(true));
        }
        criteria
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ObjectType::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown object type '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// What a session is asked to retrieve.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFilter {
    pub object_type: ObjectType,
    /// Source table; sources without tables ignore it.
    pub table: String,
    /// Field → required value. All must match.
    pub criteria: BTreeMap<String, Value>,
    /// Optional ordering column. `None` keeps the source's natural order.
    pub order_by: Option<String>,
}

impl ObjectFilter {
    pub fn for_type(object_type: ObjectType) -> Self {
        Self {
            object_type,
            table: object_type.default_table().to_string(),
            criteria: object_type.default_criteria(),
            order_by: None,
        }
    }

    /// In-memory evaluation of the criteria, for sources that cannot push
    /// them down.
    pub fn matches(&self, raw: &RawRecord) -> bool {
        self.criteria
            .iter()
            .all(|(field, expected)| raw.get(field).is_some_and(|v| loosely_equal(v, expected)))
    }
}

/// Flag columns often come back as 0/1 integers or "true"/"false" strings.
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(n), Value::Bool(b)) => n.as_i64() == Some(i64::from(*b)),
        (Value::String(s), Value::Bool(b)) => s.eq_ignore_ascii_case(&b.to_string()),
        _ => actual == expected,
    }
}
