use crate::error::error_response;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use crmcafe_core::{CrmError, LinkRepository, LinkSpec, Record};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
struct LinkState {
    repo: Arc<dyn LinkRepository>,
    link: Arc<LinkSpec>,
}

/// Association routes on a single path. `POST` and `DELETE` take a JSON
/// body naming both keys, e.g. `{"customer_id": 1, "tag_id": 2}`.
pub fn build_link_router(path: &str, link: LinkSpec, repo: Arc<dyn LinkRepository>) -> Router {
    let state = LinkState {
        repo,
        link: Arc::new(link),
    };

    Router::new()
        .route(
            path,
            get(list_handler).post(link_handler).delete(unlink_handler),
        )
        .with_state(state)
}

fn key(body: &Record, field: &str) -> Result<i64, CrmError> {
    body.get(field)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| CrmError::Validation(format!("{field} must be an integer")))
}

fn keys(spec: &LinkSpec, body: &Record) -> Result<(i64, i64), CrmError> {
    Ok((key(body, &spec.left)?, key(body, &spec.right)?))
}

async fn list_handler(State(state): State<LinkState>) -> impl IntoResponse {
    match state.repo.list().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => error_response(e),
    }
}

async fn link_handler(
    State(state): State<LinkState>,
    Json(body): Json<Record>,
) -> impl IntoResponse {
    let (left, right) = match keys(&state.link, &body) {
        Ok(pair) => pair,
        Err(e) => return error_response(e),
    };
    match state.repo.link(left, right).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => Json(json!({ "inserted": false })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn unlink_handler(
    State(state): State<LinkState>,
    Json(body): Json<Record>,
) -> impl IntoResponse {
    let (left, right) = match keys(&state.link, &body) {
        Ok(pair) => pair,
        Err(e) => return error_response(e),
    };
    match state.repo.unlink(left, right).await {
        Ok(deleted) => Json(json!({ "deleted": deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
