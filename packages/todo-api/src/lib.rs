//! In-memory reference server for the todo list REST API.
//!
//! Provides the HTTP endpoints for listing, creating, reading, replacing
//! and deleting todo items, backed by a process-local store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod router;
pub mod server;
pub mod store;
