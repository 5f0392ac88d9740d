//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the `StudentStore` pool wrapper and all queries

use crate::error::ApiError;

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{SessionRow, StudentRow, UserRow};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, StudentStore};

/// Connect to `database_url`, run the DDL, and hand back a ready store.
pub async fn spawn(database_url: &str) -> Result<StudentStore, ApiError> {
    let store = StudentStore::connect(database_url).await?;
    store.init_schema().await?;
    Ok(store)
}
