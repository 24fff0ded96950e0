use crate::value::{ColumnKind, SqlValue};

/// Insertion-ordered column → value mapping for writes.
///
/// `None` marks a field that is absent from the request and must be left
/// untouched; `Some(SqlValue::Null(_))` explicitly writes NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePayload {
    entries: Vec<(String, Option<SqlValue>)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field, replacing any previous value for the same column.
    pub fn push(&mut self, column: impl Into<String>, value: Option<SqlValue>) -> &mut Self {
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, Some(value.into()));
        self
    }

    pub fn set_null(mut self, column: impl Into<String>, kind: ColumnKind) -> Self {
        self.push(column, Some(SqlValue::Null(kind)));
        self
    }

    pub fn absent(mut self, column: impl Into<String>) -> Self {
        self.push(column, None);
        self
    }

    /// Fields that carry a value, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries
            .iter()
            .filter_map(|(c, v)| v.as_ref().map(|v| (c.as_str(), v)))
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<SqlValue>)> for UpdatePayload {
    fn from_iter<I: IntoIterator<Item = (K, Option<SqlValue>)>>(iter: I) -> Self {
        let mut payload = UpdatePayload::new();
        for (k, v) in iter {
            payload.push(k, v);
        }
        payload
    }
}
