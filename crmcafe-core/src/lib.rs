pub mod changes;
pub mod config;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod testing;
pub mod value;

pub use changes::UpdatePayload;
pub use config::{
    quote_ident, ColumnSpec, LinkConfig, LinkSpec, ResourceConfig, ServerConfig, TableSpec,
};
pub use error::{CrmError, Result};
pub use filter::{FilterMap, FilterValue};
pub use pagination::{build_pagination, PageBounds, PageInfo, PageRequest};
pub use value::{ColumnKind, SqlValue};

use serde::Serialize;

/// A row as returned to clients: column name → JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// One page of rows plus the number of rows matching the filter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub data: Vec<Record>,
    pub total: i64,
}

/// CRUD access to a single table keyed by an integer primary key.
///
/// Filter and payload keys are expected to be allow-listed column
/// identifiers; implementations splice them into SQL text as-is.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    async fn list(&self, filters: &FilterMap, bounds: PageBounds) -> Result<Page>;
    async fn read(&self, id: i64) -> Result<Option<Record>>;
    async fn create(&self, row: &UpdatePayload) -> Result<Record>;
    /// Fails with [`CrmError::Validation`] when `changes` has no present field.
    async fn update(&self, id: i64, changes: &UpdatePayload) -> Result<Option<Record>>;
    async fn remove(&self, id: i64) -> Result<bool>;
}

/// Access to a many-to-many association table.
#[async_trait::async_trait]
pub trait LinkRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Record>>;
    /// Returns `None` when the pair is already linked.
    async fn link(&self, left: i64, right: i64) -> Result<Option<Record>>;
    async fn unlink(&self, left: i64, right: i64) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<()>;
}
