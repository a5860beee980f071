//! Payloads sent to and items expected from the server.

use serde::{Deserialize, Serialize};

/// An item as the harness expects the server to report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub order: i64,
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub order: i64,
}

/// Body of an update request. The id travels as `_id`.
#[derive(Debug, Clone, Serialize)]
pub struct TodoReplacement {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub order: i64,
}
