//! Store error types.

use thiserror::Error;

/// Todo store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No item with the given id
    #[error("Todo '{id}' not found")]
    NotFound { id: String },

    /// The `_id` carried in a replacement body disagrees with the addressed item
    #[error("Body id '{body_id}' does not match path id '{path_id}'")]
    IdMismatch { path_id: String, body_id: String },
}
