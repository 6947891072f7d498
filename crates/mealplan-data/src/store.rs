//! Persistent record store
//!
//! The collection is read in full and written in full. There is no partial
//! or delta persistence.

use serde_json::Value;
use std::sync::Arc;

use mealplan_storage::Medium;

use crate::record::Record;
use crate::Result;

/// Logical key the collection blob is stored under
pub const DEFAULT_STORAGE_KEY: &str = "meal_planner_data_v1";

pub struct RecordStore {
    medium: Arc<dyn Medium>,
    key: String,
}

impl RecordStore {
    pub fn new<M: Medium + 'static>(medium: M) -> Self {
        Self::with_key(medium, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key<M: Medium + 'static>(medium: M, key: impl Into<String>) -> Self {
        Self {
            medium: Arc::new(medium),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the whole collection.
    ///
    /// Never fails: a missing, empty or unreadable blob yields an empty
    /// collection. Elements without a string `id` are skipped, and since
    /// `save_all` rewrites the whole blob they are gone after the next save.
    pub fn load_all(&self) -> Vec<Record> {
        let raw = match self.medium.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read records, starting empty");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Corrupt record blob, starting empty");
                return Vec::new();
            }
        };

        let total = values.len();
        let records: Vec<Record> = values.into_iter().filter_map(Record::from_value).collect();

        if records.len() != total {
            tracing::warn!(
                key = %self.key,
                skipped = total - records.len(),
                "Skipped stored elements without a string id; the next save drops them"
            );
        }

        records
    }

    /// Overwrite the stored blob with the full collection
    pub fn save_all(&self, records: &[Record]) -> Result<()> {
        let serialized = serde_json::to_string(records)?;
        self.medium.set_item(&self.key, &serialized)?;
        Ok(())
    }

    /// Drop the stored blob entirely
    pub fn clear(&self) -> Result<()> {
        self.medium.remove_item(&self.key)?;
        Ok(())
    }
}

impl Clone for RecordStore {
    fn clone(&self) -> Self {
        Self {
            medium: Arc::clone(&self.medium),
            key: self.key.clone(),
        }
    }
}

/// Replace the first record with the same id in place, or append.
pub fn upsert(records: &mut Vec<Record>, record: Record) -> &mut Vec<Record> {
    match records.iter().position(|r| r.id == record.id) {
        Some(idx) => records[idx] = record,
        None => records.push(record),
    }
    records
}

/// Remove every record with the given id, keeping the relative order of the rest.
/// Returns true if anything was removed.
pub fn remove_by_id(records: &mut Vec<Record>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id != id);
    records.len() != before
}
