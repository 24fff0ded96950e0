use crate::{CrmError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Storage type of a column, used to coerce loosely-typed request input
/// into values the driver can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
    Bool,
    Timestamp,
    Date,
    Json,
}

/// A single bound parameter.
///
/// Nulls remember the kind of the column they are written to so that a
/// typed NULL can be sent to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null(ColumnKind),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Json(Value),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null(_))
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            SqlValue::Null(kind) => *kind,
            SqlValue::Bool(_) => ColumnKind::Bool,
            SqlValue::Int(_) => ColumnKind::Int,
            SqlValue::Float(_) => ColumnKind::Float,
            SqlValue::Text(_) => ColumnKind::Text,
            SqlValue::Timestamp(_) => ColumnKind::Timestamp,
            SqlValue::Date(_) => ColumnKind::Date,
            SqlValue::Json(_) => ColumnKind::Json,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl ColumnKind {
    pub fn name(self) -> &'static str {
        match self {
            ColumnKind::Int => "integer",
            ColumnKind::Float => "number",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "boolean",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Date => "date",
            ColumnKind::Json => "json",
        }
    }

    /// Coerce a raw query-string value.
    pub fn parse_text(self, raw: &str) -> Result<SqlValue> {
        let invalid = || CrmError::Validation(format!("Invalid {} value: {raw:?}", self.name()));
        match self {
            ColumnKind::Text => Ok(SqlValue::Text(raw.to_string())),
            ColumnKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(SqlValue::Int)
                .map_err(|_| invalid()),
            ColumnKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(SqlValue::Float)
                .ok_or_else(invalid),
            ColumnKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" | "yes" => Ok(SqlValue::Bool(true)),
                "false" | "f" | "0" | "no" => Ok(SqlValue::Bool(false)),
                _ => Err(invalid()),
            },
            ColumnKind::Timestamp => parse_timestamp(raw)
                .map(SqlValue::Timestamp)
                .ok_or_else(invalid),
            ColumnKind::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(SqlValue::Date)
                .map_err(|_| invalid()),
            ColumnKind::Json => serde_json::from_str(raw)
                .map(SqlValue::Json)
                .map_err(|_| invalid()),
        }
    }

    /// Coerce a value taken from a JSON request body.
    pub fn from_json(self, value: &Value) -> Result<SqlValue> {
        let invalid =
            || CrmError::Validation(format!("Invalid {} value: {value}", self.name()));
        match (self, value) {
            (_, Value::Null) => Ok(SqlValue::Null(self)),
            (ColumnKind::Json, v) => Ok(SqlValue::Json(v.clone())),
            (ColumnKind::Text, Value::String(s)) => Ok(SqlValue::Text(s.clone())),
            (ColumnKind::Text, Value::Number(n)) => Ok(SqlValue::Text(n.to_string())),
            (ColumnKind::Text, Value::Bool(b)) => Ok(SqlValue::Text(b.to_string())),
            (ColumnKind::Int, Value::Number(n)) => n.as_i64().map(SqlValue::Int).ok_or_else(invalid),
            (ColumnKind::Float, Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(SqlValue::Float)
                .ok_or_else(invalid),
            (ColumnKind::Bool, Value::Bool(b)) => Ok(SqlValue::Bool(*b)),
            (_, Value::String(s)) => self.parse_text(s),
            _ => Err(invalid()),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
