use std::sync::Arc;

use crate::error::StoreResult;

/// Single-key state store.
///
/// All implementations must satisfy these invariants:
/// - `get_state` on a key that was never written returns `Ok(None)`.
/// - `put_state` replaces the whole value stored under the key.
/// - The store never interprets values.
/// - All I/O errors are propagated, never silently ignored.
///
/// Callers treat an empty value the same as an absent one.
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, creating or replacing it.
    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()>;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put_state(key, value)
    }
}

impl<T: StateStore + ?Sized> StateStore for Box<T> {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put_state(key, value)
    }
}

impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put_state(key, value)
    }
}
