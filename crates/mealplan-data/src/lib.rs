//! Meal Planner Data Layer
//!
//! - The whole collection of records lives in one serialized blob under a fixed key
//! - Records are identified by `id`; create and update both upsert by id
//! - Every mutation rewrites the blob in full
//! - After every mutation the registered handler receives the complete collection

mod error;
mod record;
mod sdk;
mod store;

pub use error::DataError;
pub use record::{new_record_id, Ack, Record};
pub use sdk::{ChangeHandler, DataSdk};
pub use store::{remove_by_id, upsert, RecordStore, DEFAULT_STORAGE_KEY};

pub type Result<T> = std::result::Result<T, DataError>;
