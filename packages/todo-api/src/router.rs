//! Matchit routing configuration.

use std::sync::Arc;

use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::config::ApiConfig;
use crate::handlers;
use crate::handlers::request_utils::JSON_CONTENT_TYPE;
use crate::store::TodoStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Todo storage
    pub store: Arc<TodoStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the todo routes.
    pub fn new(store: Arc<TodoStore>, config: Arc<ApiConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/api/todos", RouteHandler::Collection)
            .expect("Failed to insert /api/todos route");
        router
            .insert("/api/todos/{id}", RouteHandler::Item)
            .expect("Failed to insert /api/todos/{id} route");

        Self {
            inner: router,
            state: AppState { store, config },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// Handler errors are turned into JSON error responses here, so the
    /// returned `Err` only covers failures to build a response at all.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();
        let method = req.method().clone();

        let result = match self.inner.at(&path) {
            Ok(matched) => {
                matched
                    .value
                    .handle(req, matched.params, self.state.clone())
                    .await
            }
            Err(_) => Err(RouterError::RouteNotFound(path.clone())),
        };

        match result {
            Ok(response) => {
                tracing::debug!(%method, %path, status = response.status().as_u16(), "Handled request");
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(%method, %path, error = %err, "Request failed");
                err.into_response()
            }
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Collection,
    Item,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        let method = req.method().clone();
        match self {
            RouteHandler::Collection => match method {
                Method::GET => handlers::list_todos(req, params, state).await,
                Method::POST => handlers::create_todo(req, params, state).await,
                _ => Err(RouterError::MethodNotAllowed),
            },
            RouteHandler::Item => match method {
                Method::GET => handlers::read_todo(req, params, state).await,
                Method::PUT => handlers::update_todo(req, params, state).await,
                Method::DELETE => handlers::delete_todo(req, params, state).await,
                _ => Err(RouterError::MethodNotAllowed),
            },
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    /// No route matches the path
    RouteNotFound(String),
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) | RouterError::RouteNotFound(_) => 404,
        }
    }

    /// Builds the JSON error response for this error.
    pub fn into_response(self) -> Result<Response<Bytes>, RouterError> {
        let status = self.status();
        let (message, details) = match self {
            RouterError::MethodNotAllowed => ("Method Not Allowed".to_string(), None),
            RouterError::Timeout => ("Request Timeout".to_string(), None),
            RouterError::RouteNotFound(path) => (
                "Not Found".to_string(),
                Some(format!("No route found for {}", path)),
            ),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg) => (msg, None),
        };

        let error_response = handlers::error_response(status, message, details);
        let body = serde_json::to_vec(&error_response).map_err(|e| {
            RouterError::InternalError(format!("Failed to serialize error response: {}", e))
        })?;

        Response::builder()
            .status(status)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(Bytes::from(body))
            .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::RouteNotFound(path) => write!(f, "No route found for {}", path),
        }
    }
}

impl std::error::Error for RouterError {}
