//! Error types returned by `ChainedHashMap`.

use core::fmt;
use thiserror::Error;

/// Failure of a keyed read.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// `get`/`get_mut` on a key that is not in the map.
    #[error("key not found")]
    KeyNotFound,
}

/// Returned by `try_put` when the key is already present. Carries the
/// rejected pair back to the caller; the stored value is left untouched.
pub struct DuplicateKey<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> DuplicateKey<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Hands the rejected `(key, value)` back.
    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V> fmt::Debug for DuplicateKey<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateKey")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<K, V> fmt::Display for DuplicateKey<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key already present")
    }
}

impl<K: fmt::Debug, V> std::error::Error for DuplicateKey<K, V> {}
