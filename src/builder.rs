//! Construction settings for `ChainedHashMap`.

use crate::chained_hash_map::{ChainedHashMap, DEFAULT_CAPACITY};
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Collects the initial bucket count and hash builder, then builds an empty
/// map. `Builder::new().capacity(4).build()` is the same as
/// `ChainedHashMap::with_capacity(4)`.
#[derive(Clone, Debug)]
pub struct Builder<S = DefaultHashBuilder> {
    capacity: usize,
    hasher: S,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hasher: DefaultHashBuilder::default(),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Builder<S> {
    /// Initial number of bucket slots; 0 is coerced to 1 at build time.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Replaces the hash builder used for keys.
    pub fn hasher<T: BuildHasher>(self, hasher: T) -> Builder<T> {
        Builder {
            capacity: self.capacity,
            hasher,
        }
    }

    pub fn build<K, V>(self) -> ChainedHashMap<K, V, S>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        ChainedHashMap::with_capacity_and_hasher(self.capacity, self.hasher)
    }
}
