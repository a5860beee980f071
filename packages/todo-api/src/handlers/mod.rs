//! HTTP endpoint implementations for the todo collection.

pub mod request_utils;
pub mod response;
pub mod todo_handlers;

pub use response::{error_response, ApiError, ErrorResponse};
pub use todo_handlers::{create_todo, delete_todo, list_todos, read_todo, update_todo};
