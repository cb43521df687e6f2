use crate::domain::object_type::ObjectFilter;
use crate::infrastructure::db::dialect::QueryDialect;

// ─────────────────────────────────────────────────────────────────────────────
// Query builders
// ─────────────────────────────────────────────────────────────────────────────

/// Build `SELECT * FROM <schema>.<table> [WHERE ...] [ORDER BY ...]` for an
/// object filter.
///
/// Criteria are rendered as literals in field-name order. Without `order_by`
/// no ordering is imposed: the database's natural order is what gets compared.
pub fn build_select_query(
    schema: Option<&str>,
    filter: &ObjectFilter,
    dialect: &dyn QueryDialect,
) -> String {
    let prefix = schema.map(|s| dialect.schema_prefix(s)).unwrap_or_default();
    let mut sql = format!("SELECT * FROM {}{}", prefix, dialect.quote_ident(&filter.table));

    let conditions: Vec<String> = filter
        .criteria
        .iter()
        .map(|(col, val)| {
            if val.is_null() {
                format!("{} IS NULL", dialect.quote_ident(col))
            } else {
                format!("{} = {}", dialect.quote_ident(col), dialect.sql_literal(val))
            }
        })
        .collect();
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    if let Some(order) = &filter.order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(&dialect.quote_ident(order));
    }

    sql
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
