use async_trait::async_trait;
use crmcafe_core::{
    CrmError, FilterMap, HealthCheck, LinkConfig, LinkRepository, Page, PageBounds, Record,
    Repository, ResourceConfig, Result, ServerConfig, UpdatePayload,
};
use crmcafe_server::{build_app, resources};
use serde_json::{json, Value};
use std::sync::Arc;

struct Health(bool);

#[async_trait]
impl HealthCheck for Health {
    async fn ping(&self) -> Result<()> {
        if self.0 {
            Ok(())
        } else {
            Err(CrmError::Storage("connection refused".to_string()))
        }
    }
}

/// Answers every list with one canned row and nothing else.
struct Canned;

#[async_trait]
impl Repository for Canned {
    async fn list(&self, _filters: &FilterMap, _bounds: PageBounds) -> Result<Page> {
        let mut row = Record::new();
        row.insert("tag_id".to_string(), json!(1));
        Ok(Page {
            data: vec![row],
            total: 1,
        })
    }
    async fn read(&self, _id: i64) -> Result<Option<Record>> {
        Ok(None)
    }
    async fn create(&self, _row: &UpdatePayload) -> Result<Record> {
        Err(CrmError::Storage("read only".to_string()))
    }
    async fn update(&self, _id: i64, _changes: &UpdatePayload) -> Result<Option<Record>> {
        Ok(None)
    }
    async fn remove(&self, _id: i64) -> Result<bool> {
        Ok(false)
    }
}

struct NoLinks;

#[async_trait]
impl LinkRepository for NoLinks {
    async fn list(&self) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }
    async fn link(&self, _left: i64, _right: i64) -> Result<Option<Record>> {
        Ok(None)
    }
    async fn unlink(&self, _left: i64, _right: i64) -> Result<bool> {
        Ok(false)
    }
}

async fn spawn(healthy: bool) -> String {
    let config = ServerConfig {
        port: 0,
        resources: vec![ResourceConfig {
            path: "/tags".to_string(),
            table: resources::tags(),
            repository: Arc::new(Canned),
        }],
        links: vec![LinkConfig {
            path: "/customer-tags".to_string(),
            link: resources::customer_tags(),
            repository: Arc::new(NoLinks),
        }],
        health: Arc::new(Health(healthy)),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_app(config)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn get_json(url: String) -> (u16, Value) {
    let res = reqwest::get(url).await.unwrap();
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn index_greets() {
    let base = spawn(true).await;
    let (status, body) = get_json(format!("{base}/")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Welcome to CRM-Café's server"}));
}

#[tokio::test]
async fn health_reflects_database_ping() {
    let up = spawn(true).await;
    assert_eq!(
        get_json(format!("{up}/health")).await,
        (200, json!({"status": "ok"}))
    );

    let down = spawn(false).await;
    let (status, _) = get_json(format!("{down}/health")).await;
    assert_eq!(status, 503);
}

#[tokio::test]
async fn resources_and_links_are_mounted() {
    let base = spawn(true).await;
    let (status, body) = get_json(format!("{base}/tags")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], json!([{"tag_id": 1}]));
    assert_eq!(body["pagination"]["total"], json!(1));

    let (status, body) = get_json(format!("{base}/customer-tags")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));

    let (status, body) = get_json(format!("{base}/tags/3")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn storage_failures_are_masked() {
    let base = spawn(true).await;
    let res = reqwest::Client::new()
        .post(format!("{base}/tags"))
        .json(&json!({"name": "vip"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn cors_is_permissive() {
    let base = spawn(true).await;
    let res = reqwest::Client::new()
        .get(format!("{base}/"))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
