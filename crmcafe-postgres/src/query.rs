use crmcafe_core::{FilterMap, FilterValue, SqlValue, UpdatePayload};

/// A SQL fragment and its bound values. Placeholder `$k` in `clause`
/// always refers to `values[k - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPart {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

impl QueryPart {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }
}

/// Running `$n` cursor: every bound value takes the next index.
#[derive(Default)]
struct Params {
    values: Vec<SqlValue>,
}

impl Params {
    fn bind(&mut self, value: SqlValue) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

/// Build a `WHERE` clause from a filter map.
///
/// Inactive entries (null, empty text, empty list) are skipped. Returns an
/// empty fragment, without the `WHERE` keyword, when nothing is left.
/// Keys are emitted verbatim and must be trusted column identifiers.
pub fn build_filters(filters: &FilterMap) -> QueryPart {
    let mut params = Params::default();
    let mut conditions = Vec::new();

    for (column, value) in filters.active() {
        let condition = match value {
            FilterValue::Wildcard(pattern) => {
                let placeholder = params.bind(SqlValue::Text(pattern.replace('*', "%")));
                format!("{column} ILIKE {placeholder}")
            }
            FilterValue::List(items) => {
                let placeholders: Vec<String> =
                    items.iter().map(|v| params.bind(v.clone())).collect();
                format!("{column} IN ({})", placeholders.join(", "))
            }
            FilterValue::Scalar(v) => {
                let placeholder = params.bind(v.clone());
                format!("{column} = {placeholder}")
            }
            FilterValue::Null => continue,
        };
        conditions.push(condition);
    }

    if conditions.is_empty() {
        return QueryPart::default();
    }

    QueryPart {
        clause: format!("WHERE {}", conditions.join(" AND ")),
        values: params.values,
    }
}

/// Build the assignment list of an `UPDATE ... SET`.
///
/// Absent fields are skipped, explicit nulls are kept. An empty clause
/// means there is nothing to update.
pub fn build_update_set(changes: &UpdatePayload) -> QueryPart {
    let mut params = Params::default();
    let assignments: Vec<String> = changes
        .present()
        .map(|(column, value)| format!("{column} = {}", params.bind(value.clone())))
        .collect();

    QueryPart {
        clause: assignments.join(", "),
        values: params.values,
    }
}

/// Build the `(cols) VALUES ($1, ...)` tail of an `INSERT`, or
/// `DEFAULT VALUES` when no field is present.
pub fn build_insert(row: &UpdatePayload) -> QueryPart {
    let mut params = Params::default();
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();
    for (column, value) in row.present() {
        columns.push(column);
        placeholders.push(params.bind(value.clone()));
    }

    if columns.is_empty() {
        return QueryPart {
            clause: "DEFAULT VALUES".to_string(),
            values: vec![],
        };
    }

    QueryPart {
        clause: format!(
            "({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        ),
        values: params.values,
    }
}
