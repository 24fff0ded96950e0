use chrono::{DateTime, NaiveDate, Utc};
use crmcafe_core::{ColumnKind, CrmError, Record, Result, SqlValue};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{Postgres, Row};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind values in order, so `values[k - 1]` lands on `$k`.
pub(crate) fn bind_all<'q>(mut query: PgQuery<'q>, values: &[SqlValue]) -> PgQuery<'q> {
    for value in values {
        query = bind_value(query, value);
    }
    query
}

fn bind_value<'q>(query: PgQuery<'q>, value: &SqlValue) -> PgQuery<'q> {
    match value {
        SqlValue::Null(kind) => match kind {
            ColumnKind::Int => query.bind(None::<i64>),
            ColumnKind::Float => query.bind(None::<f64>),
            ColumnKind::Text => query.bind(None::<String>),
            ColumnKind::Bool => query.bind(None::<bool>),
            ColumnKind::Timestamp => query.bind(None::<DateTime<Utc>>),
            ColumnKind::Date => query.bind(None::<NaiveDate>),
            ColumnKind::Json => query.bind(None::<Json<serde_json::Value>>),
        },
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(i) => query.bind(*i),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Timestamp(ts) => query.bind(*ts),
        SqlValue::Date(d) => query.bind(*d),
        SqlValue::Json(v) => query.bind(Json(v.clone())),
    }
}

/// Decode the `record` column produced by `to_jsonb(<table>.*)`.
pub(crate) fn row_to_record(row: &PgRow) -> Result<Record> {
    let value: serde_json::Value = row
        .try_get("record")
        .map_err(|e| CrmError::Storage(e.to_string()))?;
    match value {
        serde_json::Value::Object(record) => Ok(record),
        other => Err(CrmError::Parse(format!("expected a JSON object row, got {other}"))),
    }
}

/// SQLSTATE codes caused by the request rather than the server: unique,
/// foreign key, not null and check violations, invalid text
/// representation, numeric value out of range.
const CLIENT_ERROR_CODES: [&str; 6] = ["23505", "23503", "23502", "23514", "22P02", "22003"];

fn is_client_error_code(code: &str) -> bool {
    CLIENT_ERROR_CODES.contains(&code)
}

/// Constraint and input errors raised by the server are the client's
/// fault; everything else is a storage failure.
pub(crate) fn map_db_error(err: sqlx::Error) -> CrmError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().is_some_and(|code| is_client_error_code(&code)) {
            return CrmError::Validation(db_err.message().to_string());
        }
    }
    tracing::error!(error = %err, "database error");
    CrmError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_and_range_errors_are_client_errors() {
        for code in ["23505", "23503", "23502", "23514", "22P02", "22003"] {
            assert!(is_client_error_code(code), "{code}");
        }
    }

    #[test]
    fn server_side_failures_are_not_client_errors() {
        for code in ["08006", "53300", "57014", "42P01", ""] {
            assert!(!is_client_error_code(code), "{code}");
        }
    }

    #[test]
    fn non_database_errors_become_storage() {
        let err = map_db_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, CrmError::Storage(_)));
    }
}
