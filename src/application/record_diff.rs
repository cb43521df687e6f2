use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::domain::{delta::FieldChange, ports::FieldComparator, record::Record};

// ─── Record differencer ───

/// Field-level differences of a matched pair, in lexicographic field order.
///
/// Fields present on one side only are reported with the other side absent;
/// equal values are omitted.
pub fn compare_fields(left: &Record, right: &Record, comparator: &dyn FieldComparator) -> Vec<FieldChange> {
    let all_fields: BTreeSet<&String> = left.fields.keys().chain(right.fields.keys()).collect();

    all_fields
        .into_iter()
        .filter_map(|field| {
            let before = left.fields.get(field);
            let after = right.fields.get(field);
            match (before, after) {
                (Some(b), Some(a)) if comparator.equal(b, a) => None,
                _ => Some(FieldChange {
                    field: field.clone(),
                    before: before.cloned(),
                    after: after.cloned(),
                }),
            }
        })
        .collect()
}

// ─── Comparators ───

/// How field values are compared. Exact unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    #[default]
    Exact,
    Normalized,
}

pub fn comparator_for(mode: ComparisonMode) -> Box<dyn FieldComparator> {
    match mode {
        ComparisonMode::Exact => Box::new(ExactComparator),
        ComparisonMode::Normalized => Box::new(NormalizedComparator),
    }
}

/// Plain value equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactComparator;

impl FieldComparator for ExactComparator {
    fn equal(&self, left: &Value, right: &Value) -> bool {
        left == right
    }
}

/// Opt-in tolerant equality: object key order is ignored and numbers are
/// equal within 1e-9.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizedComparator;

impl FieldComparator for NormalizedComparator {
    fn equal(&self, left: &Value, right: &Value) -> bool {
        json_equal(left, right)
    }
}

fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(na), Value::Number(nb)) => match (na.as_f64(), nb.as_f64()) {
            (Some(fa), Some(fb)) => (fa - fb).abs() < 1e-9,
            _ => na == nb,
        },
        (Value::Array(xa), Value::Array(xb)) => {
            xa.len() == xb.len() && xa.iter().zip(xb).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(ma), Value::Object(mb)) => {
            ma.len() == mb.len()
                && ma
                    .iter()
                    .all(|(k, va)| mb.get(k).is_some_and(|vb| json_equal(va, vb)))
        }
        _ => a == b,
    }
}
