use crate::bind::{map_db_error, row_to_record};
use async_trait::async_trait;
use crmcafe_core::{quote_ident, LinkRepository, LinkSpec, Record, Result};
use sqlx::PgPool;

pub struct PostgresLinkRepository {
    pool: PgPool,
    link: LinkSpec,
}

impl PostgresLinkRepository {
    pub fn new(pool: PgPool, link: LinkSpec) -> Self {
        Self { pool, link }
    }

    fn idents(&self) -> (String, String, String) {
        (
            quote_ident(&self.link.table),
            quote_ident(&self.link.left),
            quote_ident(&self.link.right),
        )
    }
}

#[async_trait]
impl LinkRepository for PostgresLinkRepository {
    async fn list(&self) -> Result<Vec<Record>> {
        let (table, left, right) = self.idents();
        let sql = format!(
            "SELECT to_jsonb({table}.*) AS record FROM {table} ORDER BY {left}, {right}"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.iter().map(row_to_record).collect()
    }

    async fn link(&self, left_id: i64, right_id: i64) -> Result<Option<Record>> {
        let (table, left, right) = self.idents();
        let sql = format!(
            "INSERT INTO {table} ({left}, {right}) VALUES ($1, $2)
             ON CONFLICT ({left}, {right}) DO NOTHING
             RETURNING to_jsonb({table}.*) AS record"
        );
        let row = sqlx::query(&sql)
            .bind(left_id)
            .bind(right_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn unlink(&self, left_id: i64, right_id: i64) -> Result<bool> {
        let (table, left, right) = self.idents();
        let sql = format!("DELETE FROM {table} WHERE {left} = $1 AND {right} = $2");
        let result = sqlx::query(&sql)
            .bind(left_id)
            .bind(right_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
