//! Meal Planner Core
//!
//! Wires the data session to the view layer. The store owns the records;
//! every change is pushed as the full collection to a handler that
//! re-derives the view state and renders the active screen.

mod config;
mod error;
mod handler;
mod planner;

pub use config::Config;
pub use error::CoreError;
pub use handler::ViewHandler;
pub use planner::Planner;

// Re-export core components
pub use mealplan_data::{
    new_record_id, Ack, ChangeHandler, DataError, DataSdk, Record, RecordStore,
};
pub use mealplan_storage::{Database, Medium, MemoryMedium, StorageError};
pub use mealplan_view::{
    week_start, AppState, HtmlRenderer, Partition, RecordKind, Renderer, UiConfig, View,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
