use anyhow::Result;
use sqlx::any::AnyRow;
use sqlx::{Column, Row, TypeInfo};
use std::collections::BTreeMap;

use crate::domain::record::RawRecord;
use crate::infrastructure::db::dialect::col_to_json;

/// Convert a sqlx `AnyRow` into a `RawRecord`, one entry per column.
pub fn row_to_raw(row: &AnyRow) -> Result<RawRecord> {
    let mut map = BTreeMap::new();
    for col in row.columns() {
        let value = col_to_json(row, col.ordinal(), col.type_info().name())?;
        map.insert(col.name().to_string(), value);
    }
    Ok(map)
}
