use crate::value::{ColumnKind, SqlValue};
use crate::{HealthCheck, LinkRepository, Repository};
use std::sync::Arc;

/// Quote a SQL identifier, doubling any embedded `"`.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub insertable: bool,
    pub updatable: bool,
    pub filterable: bool,
    /// Written on insert when the request omits the field or sends null.
    pub default: Option<SqlValue>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            insertable: true,
            updatable: true,
            filterable: true,
            default: None,
        }
    }

    /// Server-managed column: readable and filterable, never written.
    pub fn read_only(mut self) -> Self {
        self.insertable = false;
        self.updatable = false;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<SqlValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn ident(&self) -> String {
        quote_ident(&self.name)
    }
}

/// Column allow-list for one table. Only columns declared here are ever
/// spliced into generated SQL.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub name: String,
    pub primary_key: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    /// A table keyed by an integer primary key, which is registered as a
    /// read-only column.
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        let primary_key = primary_key.into();
        Self {
            name: name.into(),
            columns: vec![ColumnSpec::new(primary_key.clone(), ColumnKind::Int).read_only()],
            primary_key,
        }
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.retain(|c| c.name != column.name);
        self.columns.push(column);
        self
    }

    pub fn find(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn ident(&self) -> String {
        quote_ident(&self.name)
    }

    pub fn key_ident(&self) -> String {
        quote_ident(&self.primary_key)
    }
}

/// A two-column association table with a composite primary key.
#[derive(Debug, Clone)]
pub struct LinkSpec {
    pub table: String,
    pub left: String,
    pub right: String,
}

impl LinkSpec {
    pub fn new(
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            left: left.into(),
            right: right.into(),
        }
    }
}

pub struct ResourceConfig {
    pub path: String,
    pub table: TableSpec,
    pub repository: Arc<dyn Repository>,
}

pub struct LinkConfig {
    pub path: String,
    pub link: LinkSpec,
    pub repository: Arc<dyn LinkRepository>,
}

pub struct ServerConfig {
    pub port: u16,
    pub resources: Vec<ResourceConfig>,
    pub links: Vec<LinkConfig>,
    pub health: Arc<dyn HealthCheck>,
}
