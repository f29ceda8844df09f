//! chained-hashmap: a single-threaded, separate-chaining map with
//! insert-if-absent semantics and load-factor driven doubling.
//!
//! Internal Design:
//!
//! Summary
//! - Storage: a `Vec` of buckets; each bucket is a `VecDeque` of owned
//!   `(key, value, hash)` entries. The vector length is the capacity.
//! - Placement: an entry lives in bucket `hash % capacity`. Hashing is
//!   supplied by `K: Hash` through the map's `S: BuildHasher`; the map
//!   never defines hashing itself.
//! - Chains are newest-first: `put` pushes to the front, lookups scan from
//!   the front and stop at the first equal key.
//!
//! Contract
//! - `put` inserts only if the key is absent and returns `false` otherwise.
//!   The stored value is never overwritten. `try_put` is the same check
//!   but returns the rejected pair.
//! - `get`/`get_mut` fail with `MapError::KeyNotFound`; `remove` returns
//!   `None` for a missing key. The asymmetry is deliberate.
//! - `clear` drops every entry but keeps the current capacity.
//! - `render` (and `Display`) prints one value per line, buckets in index
//!   order, newest-first within a bucket. The empty map renders as "".
//!
//! Growth
//! - Before placing a new entry, `put` computes `(len + 1) / capacity`. If
//!   that reaches `LOAD_FACTOR_THRESHOLD` (0.85) the bucket array doubles
//!   and every entry is relocated in one synchronous pass; the new entry is
//!   then placed against the doubled capacity.
//! - Relocation walks each old chain front to back and pushes each entry to
//!   the front of its new chain, so entries sharing a new chain come out
//!   reversed. No ordering between entries is promised beyond that.
//! - Capacity never shrinks: neither `remove` nor `clear` reallocates a
//!   smaller table.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash; resizing recomputes the bucket index
//!   from the stored hash, so `K: Hash` is never invoked after insertion.
//! - Lookups compare the stored hash before calling `K: Eq`.
//!
//! Reentrancy policy
//! - Methods that call `K: Hash`/`K: Eq` enter a debug-only guard; a key
//!   whose `Eq` or `Hash` reaches back into the same map panics in debug
//!   builds instead of observing a half-finished scan or resize.
//! - Entries unlinked by `remove`/`clear` are dropped after the structure
//!   is consistent again, so `Drop` for `K`/`V` may touch the map.
//!
//! Notes and non-goals
//! - Single-threaded: `!Send`/`!Sync`; callers serialize access.
//! - No persistence; callers serialize entries themselves via `iter`.
//! - Callers receive references tied to the map borrow, never handles
//!   into the bucket storage that could outlive a `remove` or resize.

mod builder;
mod chained_hash_map;
mod chained_hash_map_proptest;
mod error;
pub mod iter;
mod op_guard;

// Public surface
pub use builder::Builder;
pub use chained_hash_map::{ChainedHashMap, DEFAULT_CAPACITY, LOAD_FACTOR_THRESHOLD};
pub use error::{DuplicateKey, MapError};
pub use hashbrown::hash_map::DefaultHashBuilder;
