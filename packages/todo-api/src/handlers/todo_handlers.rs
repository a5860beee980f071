//! Todo collection and item handlers.

use hyper::{body::Bytes, Request, Response};

use crate::model::{NewTodo, TodoReplacement};
use crate::router::{AppState, RouterError};

use super::request_utils::{
    json_ok, map_store_error_to_router_error, read_json_body, todo_id, MatchitParams,
};

/// Lists every todo item.
///
/// # Endpoint
/// `GET /api/todos`
///
/// # Response
/// - **200 OK**: JSON array of items, in id order (possibly empty)
pub async fn list_todos(
    _req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let items = state.store.list();
    json_ok(&items)
}

/// Creates a todo item.
///
/// # Endpoint
/// `POST /api/todos`
///
/// # Request Body
/// ```json
/// { "title": "sample item", "completed": false, "order": 1 }
/// ```
///
/// # Response
/// - **200 OK**: the stored item including its assigned `id`
///
/// # Errors
/// - **400 Bad Request**: body is not a valid todo
///
/// # Notes
/// - Returns 200 rather than 201; clients of this API depend on it
pub async fn create_todo(
    req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let todo: NewTodo = read_json_body(req, state.config.request_timeout_ms).await?;
    let item = state.store.create(todo);
    tracing::debug!(id = %item.id, "Created todo");
    json_ok(&item)
}

/// Reads one todo item.
///
/// # Endpoint
/// `GET /api/todos/{id}`
///
/// # Errors
/// - **404 Not Found**: no item with that id
pub async fn read_todo(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = todo_id(&params)?;
    let item = state.store.get(id).map_err(map_store_error_to_router_error)?;
    json_ok(&item)
}

/// Replaces a todo item.
///
/// # Endpoint
/// `PUT /api/todos/{id}`
///
/// # Request Body
/// ```json
/// { "_id": "0", "title": "updated item", "completed": true, "order": 2 }
/// ```
///
/// # Errors
/// - **400 Bad Request**: invalid body, or `_id` differs from the path id
/// - **404 Not Found**: no item with that id
pub async fn update_todo(
    req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = todo_id(&params)?.to_string();
    let replacement: TodoReplacement = read_json_body(req, state.config.request_timeout_ms).await?;
    let item = state
        .store
        .replace(&id, replacement)
        .map_err(map_store_error_to_router_error)?;
    tracing::debug!(id = %item.id, "Updated todo");
    json_ok(&item)
}

/// Deletes a todo item.
///
/// # Endpoint
/// `DELETE /api/todos/{id}`
///
/// # Response
/// - **200 OK**: the item as it was just before deletion
///
/// # Errors
/// - **404 Not Found**: no item with that id
pub async fn delete_todo(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = todo_id(&params)?;
    let item = state
        .store
        .delete(id)
        .map_err(map_store_error_to_router_error)?;
    tracing::debug!(id = %item.id, "Deleted todo");
    json_ok(&item)
}
