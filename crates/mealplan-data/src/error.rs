//! Data layer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// The medium rejected a write. Nothing else is surfaced to callers.
    #[error("Storage error: {0}")]
    Storage(#[from] mealplan_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
