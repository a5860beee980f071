//! In-memory todo storage.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::model::{NewTodo, TodoItem, TodoReplacement};

/// Container holding all todo items.
///
/// Ids are sequential integers starting at 0, rendered as strings on the
/// wire. An id is never handed out twice, even after its item is deleted.
#[derive(Debug, Default)]
pub struct TodoStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    next_id: u64,
    items: BTreeMap<u64, Record>,
}

#[derive(Debug, Clone)]
struct Record {
    title: String,
    completed: bool,
    order: i64,
}

impl Record {
    fn to_item(&self, id: u64) -> TodoItem {
        TodoItem {
            id: id.to_string(),
            title: self.title.clone(),
            completed: self.completed,
            order: self.order,
        }
    }
}

impl TodoStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all items in id order.
    pub fn list(&self) -> Vec<TodoItem> {
        let inner = self.inner.read();
        inner
            .items
            .iter()
            .map(|(id, record)| record.to_item(*id))
            .collect()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a new item and returns it with its assigned id.
    pub fn create(&self, todo: NewTodo) -> TodoItem {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let record = Record {
            title: todo.title,
            completed: todo.completed,
            order: todo.order,
        };
        let item = record.to_item(id);
        inner.items.insert(id, record);
        item
    }

    /// Gets an item by its wire id.
    pub fn get(&self, id: &str) -> Result<TodoItem, StoreError> {
        let key = parse_id(id)?;
        let inner = self.inner.read();
        inner
            .items
            .get(&key)
            .map(|record| record.to_item(key))
            .ok_or_else(|| not_found(id))
    }

    /// Replaces every mutable field of an existing item.
    ///
    /// # Errors
    /// `StoreError::IdMismatch` if the replacement carries an `_id` other than `id`,
    /// `StoreError::NotFound` if no such item exists.
    pub fn replace(&self, id: &str, replacement: TodoReplacement) -> Result<TodoItem, StoreError> {
        if let Some(body_id) = replacement.id.as_deref() {
            if body_id != id {
                return Err(StoreError::IdMismatch {
                    path_id: id.to_string(),
                    body_id: body_id.to_string(),
                });
            }
        }

        let key = parse_id(id)?;
        let mut inner = self.inner.write();
        let record = inner.items.get_mut(&key).ok_or_else(|| not_found(id))?;
        record.title = replacement.title;
        record.completed = replacement.completed;
        record.order = replacement.order;
        Ok(record.to_item(key))
    }

    /// Removes an item, returning its last state.
    pub fn delete(&self, id: &str) -> Result<TodoItem, StoreError> {
        let key = parse_id(id)?;
        let mut inner = self.inner.write();
        inner
            .items
            .remove(&key)
            .map(|record| record.to_item(key))
            .ok_or_else(|| not_found(id))
    }
}

// Non-numeric ids can never have been assigned, so they are simply unknown.
fn parse_id(id: &str) -> Result<u64, StoreError> {
    id.parse().map_err(|_| not_found(id))
}

fn not_found(id: &str) -> StoreError {
    StoreError::NotFound { id: id.to_string() }
}
