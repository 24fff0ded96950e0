use async_trait::async_trait;
use crmcafe_core::{CrmError, HealthCheck, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;
use tracing::info;

/// DDL for the CRM tables. Every statement is `IF NOT EXISTS`.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

pub async fn connect(database_url: &str, max_connections: u32, require_ssl: bool) -> Result<PgPool> {
    let mut options =
        PgConnectOptions::from_str(database_url).map_err(|e| CrmError::Storage(e.to_string()))?;
    if require_ssl {
        options = options.ssl_mode(PgSslMode::Require);
    }
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| CrmError::Storage(e.to_string()))
}

pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| CrmError::Storage(e.to_string()))?;
    info!("schema initialised");
    Ok(())
}

pub struct PostgresHealth {
    pool: PgPool,
}

impl PostgresHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PostgresHealth {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| CrmError::Storage(e.to_string()))?;
        Ok(())
    }
}
