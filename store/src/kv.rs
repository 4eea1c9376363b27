//! Named-key value storage trait.

use crate::StoreError;

/// A store of opaque values under string keys.
///
/// Implementations must make [`KvStore::put`] all-or-nothing: after an
/// error the previous value is still the one observed by [`KvStore::get`].
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Atomically replace the value stored under `key`.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
