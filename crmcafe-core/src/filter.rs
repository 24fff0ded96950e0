use crate::value::SqlValue;

/// A single filter criterion, classified up front so clause builders can
/// match on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Absent, null or empty: contributes no condition.
    Null,
    /// Exact match.
    Scalar(SqlValue),
    /// Case-insensitive pattern where `*` matches any run of characters.
    Wildcard(String),
    /// Match any of the listed values.
    List(Vec<SqlValue>),
}

impl FilterValue {
    /// Classify a raw string: empty is not a filter, a `*` anywhere makes
    /// it a wildcard, anything else is an exact text match.
    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            FilterValue::Null
        } else if raw.contains('*') {
            FilterValue::Wildcard(raw)
        } else {
            FilterValue::Scalar(SqlValue::Text(raw))
        }
    }

    pub fn list<T: Into<SqlValue>>(items: impl IntoIterator<Item = T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Whether this value yields a condition at all.
    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Null => false,
            FilterValue::Scalar(SqlValue::Text(s)) => !s.is_empty(),
            FilterValue::Scalar(v) => !v.is_null(),
            FilterValue::Wildcard(pattern) => !pattern.is_empty(),
            FilterValue::List(items) => !items.is_empty(),
        }
    }
}

impl From<SqlValue> for FilterValue {
    fn from(value: SqlValue) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::text(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Scalar(SqlValue::Int(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Scalar(SqlValue::Bool(value))
    }
}

impl From<Vec<SqlValue>> for FilterValue {
    fn from(value: Vec<SqlValue>) -> Self {
        FilterValue::List(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Null, Into::into)
    }
}

/// Insertion-ordered column → criterion mapping.
///
/// Keys are spliced into SQL text verbatim; only allow-listed column
/// identifiers may be used as keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterMap {
    entries: Vec<(String, FilterValue)>,
}

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a criterion. Replacing keeps the original position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Entries that produce a condition, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.iter().filter(|(_, v)| v.is_active())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry produces a condition.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterMap
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FilterMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ColumnKind;

    #[test]
    fn text_is_classified_by_content() {
        assert_eq!(FilterValue::text(""), FilterValue::Null);
        assert_eq!(
            FilterValue::text("ab*cd"),
            FilterValue::Wildcard("ab*cd".to_string())
        );
        assert_eq!(
            FilterValue::text("open"),
            FilterValue::Scalar(SqlValue::Text("open".to_string()))
        );
    }

    #[test]
    fn inactive_values() {
        assert!(!FilterValue::Null.is_active());
        assert!(!FilterValue::Scalar(SqlValue::Text(String::new())).is_active());
        assert!(!FilterValue::Scalar(SqlValue::Null(ColumnKind::Int)).is_active());
        assert!(!FilterValue::List(vec![]).is_active());
        assert!(FilterValue::from(0i64).is_active());
        assert!(FilterValue::from(false).is_active());
        assert!(!FilterValue::from(None::<&str>).is_active());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = FilterMap::new();
        map.insert("a", 1i64).insert("b", 2i64).insert("a", 3i64);
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("a", &FilterValue::from(3i64)),
                ("b", &FilterValue::from(2i64)),
            ]
        );
    }

    #[test]
    fn empty_when_only_inactive_entries() {
        let map: FilterMap = [("a", FilterValue::Null), ("b", FilterValue::text(""))]
            .into_iter()
            .collect();
        assert_eq!(map.len(), 2);
        assert!(map.is_empty());
    }
}
