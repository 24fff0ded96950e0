//! The CRM tables served over HTTP.

use crmcafe_core::{
    ColumnKind, ColumnSpec, LinkConfig, LinkSpec, ResourceConfig, ServerConfig, TableSpec,
};
use crmcafe_postgres::{PgPool, PostgresHealth, PostgresLinkRepository, PostgresRepository};
use std::sync::Arc;

fn col(name: &str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec::new(name, kind)
}

fn created_at() -> ColumnSpec {
    col("created_at", ColumnKind::Timestamp).read_only()
}

pub fn users() -> TableSpec {
    TableSpec::new("users", "user_id")
        .column(col("name", ColumnKind::Text))
        .column(col("email", ColumnKind::Text))
        .column(col("password_hash", ColumnKind::Text).not_filterable())
        .column(col("role", ColumnKind::Text).with_default("agent"))
        .column(created_at())
}

pub fn customers() -> TableSpec {
    TableSpec::new("customers", "customer_id")
        .column(col("assigned_user_id", ColumnKind::Int))
        .column(col("name", ColumnKind::Text))
        .column(col("email", ColumnKind::Text))
        .column(col("phone_number", ColumnKind::Text))
        .column(col("company_name", ColumnKind::Text))
        .column(col("address", ColumnKind::Text))
        .column(created_at())
}

pub fn tags() -> TableSpec {
    TableSpec::new("tags", "tag_id").column(col("name", ColumnKind::Text))
}

pub fn calls() -> TableSpec {
    TableSpec::new("calls", "call_id")
        .column(col("customer_id", ColumnKind::Int))
        .column(col("user_id", ColumnKind::Int))
        .column(col("call_time", ColumnKind::Timestamp))
        .column(col("call_duration_seconds", ColumnKind::Int))
        .column(col("call_recording_path", ColumnKind::Text))
        .column(col("transcription_text", ColumnKind::Text))
        .column(col("summary_text", ColumnKind::Text))
        .column(col("sentiment", ColumnKind::Text))
        .column(col("embedding_vector", ColumnKind::Json).not_filterable())
        .column(col("model_used", ColumnKind::Text))
}

pub fn messages() -> TableSpec {
    TableSpec::new("messages", "message_id")
        .column(col("customer_id", ColumnKind::Int))
        .column(col("user_id", ColumnKind::Int))
        .column(col("channel", ColumnKind::Text))
        .column(col("message_body", ColumnKind::Text))
        .column(col("status", ColumnKind::Text).with_default("sent"))
        .column(col("timestamp", ColumnKind::Timestamp))
}

pub fn tasks() -> TableSpec {
    TableSpec::new("tasks", "task_id")
        .column(col("customer_id", ColumnKind::Int))
        .column(col("assigned_to", ColumnKind::Int))
        .column(col("task_description", ColumnKind::Text))
        .column(col("due_date", ColumnKind::Date))
        .column(col("status", ColumnKind::Text).with_default("pending"))
        .column(created_at())
}

pub fn customer_tags() -> LinkSpec {
    LinkSpec::new("customer_tags", "customer_id", "tag_id")
}

/// Every resource as `(path, table)`.
pub fn crm_tables() -> Vec<(&'static str, TableSpec)> {
    vec![
        ("/users", users()),
        ("/customers", customers()),
        ("/tags", tags()),
        ("/calls", calls()),
        ("/messages", messages()),
        ("/tasks", tasks()),
    ]
}

/// Wire every CRM table to a Postgres repository sharing `pool`.
pub fn postgres_config(pool: PgPool, port: u16) -> ServerConfig {
    let resources = crm_tables()
        .into_iter()
        .map(|(path, table)| ResourceConfig {
            path: path.to_string(),
            repository: Arc::new(PostgresRepository::new(pool.clone(), table.clone())),
            table,
        })
        .collect();

    let links = vec![LinkConfig {
        path: "/customer-tags".to_string(),
        repository: Arc::new(PostgresLinkRepository::new(pool.clone(), customer_tags())),
        link: customer_tags(),
    }];

    ServerConfig {
        port,
        resources,
        links,
        health: Arc::new(PostgresHealth::new(pool)),
    }
}
