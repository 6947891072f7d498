//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage is read-only: cannot write key {0}")]
    ReadOnly(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}
