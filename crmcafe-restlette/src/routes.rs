use crate::error::error_response;
use crate::params::{changes_from_body, filters_from_query, page_request_from_query, row_from_body};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use crmcafe_core::{build_pagination, CrmError, PageInfo, Record, Repository, TableSpec};
use std::sync::Arc;

#[derive(Clone)]
struct RestletteState {
    repo: Arc<dyn Repository>,
    table: Arc<TableSpec>,
}

/// CRUD routes for one table: `GET|POST {path}` and
/// `GET|PATCH|DELETE {path}/:id`.
pub fn build_restlette_router(path: &str, table: TableSpec, repo: Arc<dyn Repository>) -> Router {
    let state = RestletteState {
        repo,
        table: Arc::new(table),
    };
    let item_path = format!("{}/:id", path.trim_end_matches('/'));

    Router::new()
        .route(path, get(list_handler).post(create_handler))
        .route(
            &item_path,
            get(read_handler)
                .patch(update_handler)
                .delete(delete_handler),
        )
        .with_state(state)
}

fn parse_id(raw: &str) -> Result<i64, CrmError> {
    raw.parse()
        .map_err(|_| CrmError::validation("Invalid id"))
}

fn not_found() -> axum::response::Response {
    error_response(CrmError::NotFound(String::new()))
}

async fn list_handler(
    State(state): State<RestletteState>,
    Query(params): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let filters = match filters_from_query(&state.table, &params) {
        Ok(filters) => filters,
        Err(e) => return error_response(e),
    };
    let bounds = build_pagination(page_request_from_query(&params));

    match state.repo.list(&filters, bounds).await {
        Ok(page) => {
            let body = serde_json::json!({
                "data": page.data,
                "pagination": PageInfo::new(bounds, page.total),
            });
            Json(body).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn read_handler(
    State(state): State<RestletteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };
    match state.repo.read(id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found(),
        Err(e) => error_response(e),
    }
}

async fn create_handler(
    State(state): State<RestletteState>,
    Json(body): Json<Record>,
) -> impl IntoResponse {
    let row = match row_from_body(&state.table, &body) {
        Ok(row) => row,
        Err(e) => return error_response(e),
    };
    match state.repo.create(&row).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_handler(
    State(state): State<RestletteState>,
    Path(id): Path<String>,
    Json(body): Json<Record>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };
    let changes = match changes_from_body(&state.table, &body) {
        Ok(changes) if changes.is_empty() => {
            return error_response(CrmError::validation("No fields"))
        }
        Ok(changes) => changes,
        Err(e) => return error_response(e),
    };
    match state.repo.update(id, &changes).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => not_found(),
        Err(e) => error_response(e),
    }
}

async fn delete_handler(
    State(state): State<RestletteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };
    match state.repo.remove(id).await {
        Ok(deleted) => Json(serde_json::json!({ "deleted": deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
