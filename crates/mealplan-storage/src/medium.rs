//! Key-addressed persistent medium
//!
//! The local-storage contract: string values under string keys, each write
//! replacing the previous value in full.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::StorageError;
use crate::Result;

pub trait Medium: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process medium backed by a map.
///
/// Clones share the same contents. Setting it read-only makes every write
/// fail, which is how a full or disabled storage behaves.
#[derive(Default)]
pub struct MemoryMedium {
    items: Arc<RwLock<HashMap<String, String>>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::ReadOnly(key.to_string()));
        }
        Ok(())
    }
}

impl Medium for MemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.items
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.check_writable(key)?;
        self.items.write().remove(key);
        Ok(())
    }
}

impl Clone for MemoryMedium {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            read_only: Arc::clone(&self.read_only),
        }
    }
}
