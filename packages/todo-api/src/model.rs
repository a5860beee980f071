//! Todo item representations exchanged over the API.

use serde::{Deserialize, Serialize};

/// A stored todo item as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Server-assigned identifier
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// Client-assigned display position
    pub order: i64,
}

/// Body of `POST /api/todos`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i64,
}

/// Body of `PUT /api/todos/{id}`.
///
/// Clients may echo the item id back as `_id`; when present it must match the path.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoReplacement {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i64,
}
