use crate::bind::{bind_all, map_db_error, row_to_record};
use crate::query::{build_filters, build_insert, build_update_set};
use async_trait::async_trait;
use crmcafe_core::{
    CrmError, FilterMap, Page, PageBounds, Record, Repository, Result, TableSpec, UpdatePayload,
};
use sqlx::{PgPool, Row};
use tracing::debug;

/// Table-per-repository CRUD over a shared pool. Rows come back as JSON
/// objects built server-side with `to_jsonb`.
pub struct PostgresRepository {
    pool: PgPool,
    table: TableSpec,
}

impl PostgresRepository {
    pub fn new(pool: PgPool, table: TableSpec) -> Self {
        Self { pool, table }
    }

    pub fn table(&self) -> &TableSpec {
        &self.table
    }

    fn record_expr(&self) -> String {
        format!("to_jsonb({}.*) AS record", self.table.ident())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn list(&self, filters: &FilterMap, bounds: PageBounds) -> Result<Page> {
        let where_part = build_filters(filters);
        let table = self.table.ident();

        let count_sql = format!("SELECT COUNT(*) AS total FROM {table} {}", where_part.clause);
        debug!(sql = %count_sql, params = where_part.values.len(), "count");
        let total: i64 = bind_all(sqlx::query(&count_sql), &where_part.values)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?
            .try_get("total")
            .map_err(|e| CrmError::Storage(e.to_string()))?;

        let n = where_part.values.len();
        let page_sql = format!(
            "SELECT {} FROM {table} {} ORDER BY {} LIMIT ${} OFFSET ${}",
            self.record_expr(),
            where_part.clause,
            self.table.key_ident(),
            n + 1,
            n + 2
        );
        debug!(sql = %page_sql, params = n + 2, "page");
        let rows = bind_all(sqlx::query(&page_sql), &where_part.values)
            .bind(bounds.limit)
            .bind(bounds.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            data.push(row_to_record(row)?);
        }
        Ok(Page { data, total })
    }

    async fn read(&self, id: i64) -> Result<Option<Record>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            self.record_expr(),
            self.table.ident(),
            self.table.key_ident()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn create(&self, row: &UpdatePayload) -> Result<Record> {
        let insert = build_insert(row);
        let sql = format!(
            "INSERT INTO {} {} RETURNING {}",
            self.table.ident(),
            insert.clause,
            self.record_expr()
        );
        debug!(sql = %sql, params = insert.values.len(), "insert");
        let created = bind_all(sqlx::query(&sql), &insert.values)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        row_to_record(&created)
    }

    async fn update(&self, id: i64, changes: &UpdatePayload) -> Result<Option<Record>> {
        let set = build_update_set(changes);
        if set.is_empty() {
            return Err(CrmError::validation("No fields"));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            self.table.ident(),
            set.clause,
            self.table.key_ident(),
            set.values.len() + 1,
            self.record_expr()
        );
        debug!(sql = %sql, params = set.values.len() + 1, "update");
        let row = bind_all(sqlx::query(&sql), &set.values)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            self.table.ident(),
            self.table.key_ident()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
