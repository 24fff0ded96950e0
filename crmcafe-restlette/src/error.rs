use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use crmcafe_core::CrmError;
use serde_json::json;

/// Map a repository error onto an HTTP response with an `{"error": ...}` body.
///
/// Client errors carry their message; server errors are logged and masked.
pub fn error_response(err: CrmError) -> Response {
    let (status, message) = match &err {
        CrmError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        CrmError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
        CrmError::Storage(_) | CrmError::Parse(_) => {
            tracing::error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(json!({ "error": message }))).into_response()
}
