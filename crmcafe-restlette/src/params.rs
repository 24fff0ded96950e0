//! Translation of raw request input into builder inputs.
//!
//! The [`TableSpec`] acts as the allow-list: keys that do not name a
//! declared column are dropped here, and surviving keys are emitted as
//! quoted identifiers.

use crmcafe_core::{
    ColumnKind, ColumnSpec, CrmError, FilterMap, FilterValue, PageRequest, Record, Result,
    SqlValue, TableSpec, UpdatePayload,
};
use tracing::warn;

const PAGING_KEYS: [&str; 3] = ["page", "limit", "offset"];

/// Paging parameters from the query string; the last occurrence wins.
pub fn page_request_from_query(params: &[(String, String)]) -> PageRequest {
    let last = |key: &str| {
        params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    PageRequest::from_params(last("page"), last("limit"), last("offset"))
}

/// Build a filter map from query-string pairs.
///
/// Keys keep the order of their first appearance. A repeated key becomes
/// an `IN` list; a single text value containing `*` becomes a wildcard.
pub fn filters_from_query(table: &TableSpec, params: &[(String, String)]) -> Result<FilterMap> {
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
    for (key, value) in params {
        match grouped.iter_mut().find(|(k, _)| *k == key.as_str()) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }

    let mut filters = FilterMap::new();
    for (key, raw_values) in grouped {
        if PAGING_KEYS.contains(&key) {
            continue;
        }
        let Some(column) = table.find(key).filter(|c| c.filterable) else {
            warn!(table = %table.name, key, "ignoring unknown filter");
            continue;
        };

        let raw_values: Vec<&str> = raw_values.into_iter().filter(|v| !v.is_empty()).collect();
        let value = match raw_values.as_slice() {
            [] => FilterValue::Null,
            [single] if column.kind == ColumnKind::Text => FilterValue::text(*single),
            [single] => FilterValue::Scalar(parse_filter(column, single)?),
            many => FilterValue::List(
                many.iter()
                    .map(|raw| parse_filter(column, raw))
                    .collect::<Result<_>>()?,
            ),
        };
        filters.insert(column.ident(), value);
    }
    Ok(filters)
}

fn parse_filter(column: &ColumnSpec, raw: &str) -> Result<SqlValue> {
    column
        .kind
        .parse_text(raw)
        .map_err(|e| CrmError::Validation(format!("{}: {e}", column.name)))
}

fn coerce(column: &ColumnSpec, value: &serde_json::Value) -> Result<SqlValue> {
    column
        .kind
        .from_json(value)
        .map_err(|e| CrmError::Validation(format!("{}: {e}", column.name)))
}

/// Partial update from a JSON body. Only updatable columns are kept;
/// `null` is an explicit write of NULL.
pub fn changes_from_body(table: &TableSpec, body: &Record) -> Result<UpdatePayload> {
    let mut changes = UpdatePayload::new();
    for (key, value) in body {
        match table.find(key).filter(|c| c.updatable) {
            Some(column) => {
                changes.push(column.ident(), Some(coerce(column, value)?));
            }
            None => warn!(table = %table.name, key = %key, "ignoring non-updatable field"),
        }
    }
    Ok(changes)
}

/// Full row for an insert, in column declaration order.
///
/// A missing or null field takes the column default when one is declared.
/// Otherwise an explicit null is written as NULL and a missing field is
/// left to the database default.
pub fn row_from_body(table: &TableSpec, body: &Record) -> Result<UpdatePayload> {
    for key in body.keys() {
        if !table.find(key).is_some_and(|c| c.insertable) {
            warn!(table = %table.name, key = %key, "ignoring non-insertable field");
        }
    }

    let mut row = UpdatePayload::new();
    for column in table.columns.iter().filter(|c| c.insertable) {
        let value = match body.get(&column.name) {
            Some(v) if !v.is_null() => Some(coerce(column, v)?),
            provided => match (&column.default, provided) {
                (Some(default), _) => Some(default.clone()),
                (None, Some(_)) => Some(SqlValue::Null(column.kind)),
                (None, None) => None,
            },
        };
        row.push(column.ident(), value);
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tasks() -> TableSpec {
        TableSpec::new("tasks", "task_id")
            .column(ColumnSpec::new("customer_id", ColumnKind::Int))
            .column(ColumnSpec::new("task_description", ColumnKind::Text))
            .column(ColumnSpec::new("due_date", ColumnKind::Date))
            .column(ColumnSpec::new("status", ColumnKind::Text).with_default("pending"))
            .column(ColumnSpec::new("created_at", ColumnKind::Timestamp).read_only())
            .column(ColumnSpec::new("notes", ColumnKind::Text).not_filterable())
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn body(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn query_filters_follow_first_appearance() {
        let params = pairs(&[
            ("status", "open"),
            ("customer_id", "3"),
            ("status", "pending"),
            ("task_description", "*call*"),
        ]);
        let filters = filters_from_query(&tasks(), &params).unwrap();
        let entries: Vec<_> = filters.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        assert_eq!(
            entries,
            vec![
                (
                    r#""status""#.to_string(),
                    FilterValue::list(["open", "pending"])
                ),
                (r#""customer_id""#.to_string(), FilterValue::from(3i64)),
                (
                    r#""task_description""#.to_string(),
                    FilterValue::Wildcard("*call*".to_string())
                ),
            ]
        );
    }

    #[test]
    fn paging_and_unknown_keys_are_not_filters() {
        let params = pairs(&[
            ("page", "2"),
            ("limit", "5"),
            ("bogus", "1"),
            ("notes", "x"),
            ("status; DROP TABLE tasks", "x"),
        ]);
        let filters = filters_from_query(&tasks(), &params).unwrap();
        assert_eq!(filters.len(), 0);
    }

    #[test]
    fn empty_values_are_not_filters() {
        let params = pairs(&[("status", ""), ("customer_id", "")]);
        let filters = filters_from_query(&tasks(), &params).unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn typed_columns_reject_garbage() {
        let params = pairs(&[("customer_id", "abc")]);
        let err = filters_from_query(&tasks(), &params).unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref m) if m.starts_with("customer_id")));
    }

    #[test]
    fn star_in_a_non_text_column_is_not_a_wildcard() {
        let params = pairs(&[("customer_id", "1*")]);
        assert!(filters_from_query(&tasks(), &params).is_err());
    }

    #[test]
    fn page_request_uses_last_value() {
        let params = pairs(&[("page", "1"), ("page", "4"), ("limit", "x")]);
        assert_eq!(
            page_request_from_query(&params),
            PageRequest::new(Some(4), None)
        );
    }

    #[test]
    fn changes_keep_only_updatable_columns() {
        let changes = changes_from_body(
            &tasks(),
            &body(json!({
                "task_id": 9,
                "status": "done",
                "created_at": "2024-01-01T00:00:00Z",
                "due_date": null,
                "unknown": 1
            })),
        )
        .unwrap();
        let present: Vec<_> = changes
            .present()
            .map(|(c, v)| (c.to_string(), v.clone()))
            .collect();
        assert_eq!(
            present,
            vec![
                (r#""status""#.to_string(), SqlValue::Text("done".to_string())),
                (r#""due_date""#.to_string(), SqlValue::Null(ColumnKind::Date)),
            ]
        );
    }

    #[test]
    fn changes_with_only_unknown_fields_are_empty() {
        let changes = changes_from_body(&tasks(), &body(json!({"nope": 1}))).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn changes_reject_wrong_types() {
        let err = changes_from_body(&tasks(), &body(json!({"customer_id": "three"})));
        assert!(err.is_err());
    }

    #[test]
    fn insert_row_applies_defaults() {
        let row = row_from_body(
            &tasks(),
            &body(json!({
                "customer_id": 1,
                "task_description": "Follow up",
                "status": null,
                "notes": null,
                "created_at": "ignored"
            })),
        )
        .unwrap();
        let present: Vec<_> = row
            .present()
            .map(|(c, v)| (c.to_string(), v.clone()))
            .collect();
        assert_eq!(
            present,
            vec![
                (r#""customer_id""#.to_string(), SqlValue::Int(1)),
                (
                    r#""task_description""#.to_string(),
                    SqlValue::Text("Follow up".to_string())
                ),
                (r#""status""#.to_string(), SqlValue::Text("pending".to_string())),
                (r#""notes""#.to_string(), SqlValue::Null(ColumnKind::Text)),
            ]
        );
    }
}
