use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use prims_dispatch::{DispatchError, ErrorCode, ErrorEnvelope, OperationInfo, OperationRegistry};
use serde_json::{json, Value};

/// Shared handler state.
pub type AppState = Arc<OperationRegistry>;

/// A dispatch failure rendered as the error envelope.
pub struct ApiError(DispatchError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::Validation | ErrorCode::Encoding => StatusCode::BAD_REQUEST,
            ErrorCode::UnknownOperation => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorEnvelope::from(&self.0))).into_response()
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(registry): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "prims-server",
        "version": env!("CARGO_PKG_VERSION"),
        "operations": registry.len(),
    }))
}

/// Operation listing handler.
pub async fn operations_handler(State(registry): State<AppState>) -> Json<Vec<OperationInfo>> {
    Json(registry.operations())
}

/// Run one operation. An empty body is the empty argument object.
pub async fn operation_handler(
    State(registry): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let args = parse_args(&body)?;

    // Primitives are CPU-bound; keep them off the async workers
    let result = tokio::task::spawn_blocking(move || registry.dispatch(&name, args))
        .await
        .map_err(|e| DispatchError::Internal(format!("operation task failed: {e}")))?;

    Ok(Json(result?))
}

fn parse_args(body: &[u8]) -> Result<Value, DispatchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body)
        .map_err(|e| DispatchError::InvalidArguments(format!("request body is not JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_empty_object() {
        assert_eq!(parse_args(b"").unwrap(), json!({}));
        assert_eq!(parse_args(b"  \n").unwrap(), json!({}));
    }

    #[test]
    fn malformed_body_is_invalid_arguments() {
        let err = parse_args(b"{not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn status_follows_error_code() {
        let unknown = ApiError(DispatchError::UnknownOperation("x".into()));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        let bad = ApiError(DispatchError::validation("bad"));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        let internal = ApiError(DispatchError::Internal("boom".into()));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
