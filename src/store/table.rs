//! Store implementation
//!
//! HashMap-based table with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

/// In-memory key-value table
///
/// All synchronization is internal; callers share it through `&Store`
/// (typically behind an `Arc`).
#[derive(Debug, Default)]
pub struct Store {
    data: RwLock<HashMap<String, String>>,
}

impl Store {
    /// Create a new empty Store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `key` (write lock)
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().insert(key.into(), value.into());
    }

    /// Get a copy of the current value for `key` (read lock)
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// Remove `key` if present (write lock)
    ///
    /// Returns whether an entry was removed; absence is not an error.
    pub fn delete(&self, key: &str) -> bool {
        self.data.write().remove(key).is_some()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
