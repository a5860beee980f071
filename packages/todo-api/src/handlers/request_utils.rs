//! Request utilities for HTTP endpoints.

use http_body_util::BodyExt;
use hyper::{body::Bytes, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time;

use crate::error::StoreError;
use crate::router::RouterError;

/// Content type of every response body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Reads the body and decodes it as JSON.
pub async fn read_json_body<T: DeserializeOwned>(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<T, RouterError> {
    let body_bytes = read_request_body_with_timeout(req, timeout_ms).await?;
    serde_json::from_slice(&body_bytes)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
}

/// Returns the `id` route parameter.
pub fn todo_id<'p>(params: &'p MatchitParams<'_, '_>) -> Result<&'p str, RouterError> {
    params
        .get("id")
        .ok_or_else(|| RouterError::InternalError("Route is missing the id parameter".to_string()))
}

/// Map StoreError to appropriate RouterError
pub fn map_store_error_to_router_error(e: StoreError) -> RouterError {
    match e {
        StoreError::NotFound { .. } => RouterError::NotFound(e.to_string()),
        StoreError::IdMismatch { .. } => RouterError::BadRequest(e.to_string()),
    }
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Serializes `value` and wraps it in a `200 OK` response.
pub fn json_ok<T: Serialize>(value: &T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(200, json)
}
