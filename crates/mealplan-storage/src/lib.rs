//! Meal Planner Storage Layer
//!
//! Key-addressed blob storage for the planner's local data.
//! Every value is a string stored under a string key; the whole value is
//! replaced on each write.

mod database;
mod error;
mod medium;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use medium::{MemoryMedium, Medium};

pub type Result<T> = std::result::Result<T, StorageError>;
