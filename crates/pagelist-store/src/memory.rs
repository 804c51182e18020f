use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::StateStore;

/// In-memory, HashMap-based state store.
///
/// Intended for tests and embedding. All values are held in memory behind a
/// `RwLock` for safe concurrent access. Values are cloned on read/write.
pub struct InMemoryStateStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStateStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no key has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every key from the store.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Return a sorted list of all keys in the store.
    pub fn keys(&self) -> Vec<String> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self
            .entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStateStore")
            .field("key_count", &self.len())
            .finish()
    }
}
