//! Path-keyed shared tables.
//!
//! A [`PathTable`] maps [`PrimPath`]s to individually locked records. The
//! top-level map uses a read lock for lookups and only takes the write lock to
//! insert a missing entry, so new paths can be created while other threads
//! update existing ones. Each record sits behind its own mutex: whoever
//! holds it has exclusive access to that path for the duration of an update.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::PrimPath;

/// Shared handle to one record in a [`PathTable`].
pub type Shared<V> = Arc<Mutex<V>>;

/// Thread-safe map from path to lazily created record.
pub struct PathTable<V> {
    entries: RwLock<HashMap<PrimPath, Shared<V>>>,
}

impl<V> PathTable<V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the record for `path` if it exists.
    #[inline]
    pub fn get(&self, path: &PrimPath) -> Option<Shared<V>> {
        self.entries.read().get(path).map(Arc::clone)
    }

    /// Get the record for `path`, creating it with `init` on first use.
    pub fn get_or_insert_with(&self, path: &PrimPath, init: impl FnOnce() -> V) -> Shared<V> {
        if let Some(entry) = self.get(path) {
            return entry;
        }
        let mut entries = self.entries.write();
        // Another thread may have inserted between the two locks.
        Arc::clone(
            entries
                .entry(path.clone())
                .or_insert_with(|| Arc::new(Mutex::new(init()))),
        )
    }

    /// Check if `path` has a record.
    pub fn contains(&self, path: &PrimPath) -> bool {
        self.entries.read().contains_key(path)
    }

    /// Remove the record for `path` and every descendant. Returns how many
    /// records were dropped.
    pub fn remove_subtree(&self, path: &PrimPath) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.has_prefix(path));
        before - entries.len()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all keys, sorted.
    pub fn paths(&self) -> Vec<PrimPath> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl<V: Default> PathTable<V> {
    /// Get the record for `path`, creating a default one on first use.
    pub fn get_or_default(&self, path: &PrimPath) -> Shared<V> {
        self.get_or_insert_with(path, V::default)
    }
}

impl<V> Default for PathTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
