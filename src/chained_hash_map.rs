//! ChainedHashMap: bucket array of newest-first chains, insert-if-absent
//! `put`, and synchronous doubling once the prospective load reaches the
//! threshold.

use crate::error::{DuplicateKey, MapError};
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values};
use crate::op_guard::{Op, OpGuard};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace, warn};
use std::collections::VecDeque;

/// Bucket slots allocated when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 10;

/// `put` doubles the bucket array first when `(len + 1) / capacity`
/// reaches this value.
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.85;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
}

/// Chain for one slot. Front is the most recently inserted entry.
pub(crate) type Bucket<K, V> = VecDeque<Entry<K, V>>;

#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Vec<Bucket<K, V>>, // buckets.len() is the capacity
    len: usize,
    guard: OpGuard,
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, VecDeque::new);
    buckets
}

#[inline]
fn slot(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A `capacity` of 0 is coerced to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub const LOAD_FACTOR_THRESHOLD: f64 = LOAD_FACTOR_THRESHOLD;

    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let capacity = if capacity == 0 {
            warn!("zero bucket capacity requested; using 1");
            1
        } else {
            capacity
        };
        Self {
            hasher,
            buckets: empty_buckets(capacity),
            len: 0,
            guard: OpGuard::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Bucket index and chain position of the first entry equal to `q`.
    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let idx = slot(hash, self.buckets.len());
        self.buckets[idx]
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == q)
            .map(|pos| (idx, pos))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bucket slots. Only ever doubles.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter(Op::Lookup);
        let hash = self.make_hash(q);
        self.locate(hash, q).is_some()
    }

    /// Inserts `key -> value` only if `key` is absent. Returns `false` and
    /// leaves the map untouched when the key is already present; the
    /// stored value is never overwritten.
    pub fn put(&mut self, key: K, value: V) -> bool {
        self.try_put(key, value).is_ok()
    }

    /// Like [`put`](Self::put) but returns the rejected pair on duplicate.
    pub fn try_put(&mut self, key: K, value: V) -> Result<(), DuplicateKey<K, V>> {
        let hash = {
            let _g = self.guard.enter(Op::Put);
            let hash = self.make_hash(&key);
            if self.locate(hash, &key).is_some() {
                trace!("put rejected: key already present");
                return Err(DuplicateKey { key, value });
            }
            hash
        };

        if (self.len + 1) as f64 / self.buckets.len() as f64 >= LOAD_FACTOR_THRESHOLD {
            self.resize();
        }

        let idx = slot(hash, self.buckets.len());
        self.buckets[idx].push_front(Entry { key, value, hash });
        self.len += 1;
        Ok(())
    }

    /// Fails with [`MapError::KeyNotFound`] when `q` is absent.
    pub fn get<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter(Op::Lookup);
        let hash = self.make_hash(q);
        let (idx, pos) = self.locate(hash, q).ok_or(MapError::KeyNotFound)?;
        Ok(&self.buckets[idx][pos].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (idx, pos) = {
            let _g = self.guard.enter(Op::Lookup);
            let hash = self.make_hash(q);
            self.locate(hash, q).ok_or(MapError::KeyNotFound)?
        };
        Ok(&mut self.buckets[idx][pos].value)
    }

    /// Unlinks the entry for `q` and returns its value, or `None` if absent.
    /// Never shrinks the bucket array.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = {
            let _g = self.guard.enter(Op::Remove);
            let hash = self.make_hash(q);
            let (idx, pos) = self.locate(hash, q)?;
            self.buckets[idx].remove(pos)?
        };
        self.len -= 1;
        // Key drops here, after the structure is consistent again.
        Some(entry.value)
    }

    /// Drops every entry. Capacity stays where it is.
    pub fn clear(&mut self) {
        let fresh = empty_buckets(self.buckets.len());
        let old = std::mem::replace(&mut self.buckets, fresh);
        let dropped = std::mem::replace(&mut self.len, 0);
        trace!("cleared {} entries", dropped);
        drop(old);
    }

    // Relocates every entry into a table twice the size in one pass. Bucket
    // order is walked front to back and each entry is pushed to the front of
    // its new chain, so entries that share a new slot end up reversed.
    fn resize(&mut self) {
        let _g = self.guard.enter(Op::Resize);
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity * 2;
        let mut fresh: Vec<Bucket<K, V>> = empty_buckets(new_capacity);
        for bucket in std::mem::take(&mut self.buckets) {
            for entry in bucket {
                fresh[slot(entry.hash, new_capacity)].push_front(entry);
            }
        }
        self.buckets = fresh;
        debug!(
            "resized bucket array {} -> {} ({} entries)",
            old_capacity, new_capacity, self.len
        );
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.buckets.iter().flatten(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.buckets.iter_mut().flatten(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// One line per value, buckets in index order and newest-first within a
    /// bucket. Empty map renders as "".
    pub fn render(&self) -> String
    where
        V: fmt::Display,
    {
        self.to_string()
    }
}

impl<K, V, S> fmt::Display for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: fmt::Display,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.values() {
            writeln!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// First occurrence of a key wins; later duplicates are dropped.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::default();
        m.extend(iter);
        m
    }
}

impl<K, V, S> IntoIterator for ChainedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.len,
            it: self.buckets.into_iter().flatten(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
