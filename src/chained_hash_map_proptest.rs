#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket placement and capacity directly.

use crate::chained_hash_map::{ChainedHashMap, LOAD_FACTOR_THRESHOLD};
use crate::error::MapError;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Remove(usize),
    Contains(String),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    let pool = proptest::collection::vec("[a-z]{0,5}", 1..=24);
    (1usize..=6, pool).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

// Runs one scenario against `sut`, checking it step by step against
// std::collections::HashMap (with first-insert-wins applied by hand).
fn run_state_machine<S: BuildHasher>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut found_removes = 0usize;
    let mut accepted_puts = 0usize;
    let mut cleared = 0usize;

    for op in ops {
        let cap_before = sut.capacity();
        match op {
            OpI::Put(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                let prospective = (sut.len() + 1) as f64 / cap_before as f64;
                let ok = sut.put(k.clone(), v);
                prop_assert_eq!(ok, !already, "put succeeds iff key absent");
                if ok {
                    accepted_puts += 1;
                    model.insert(k.clone(), v);
                    let expect_cap = if prospective >= LOAD_FACTOR_THRESHOLD {
                        cap_before * 2
                    } else {
                        cap_before
                    };
                    prop_assert_eq!(sut.capacity(), expect_cap);
                } else {
                    prop_assert_eq!(sut.capacity(), cap_before, "failed put must not resize");
                }
                prop_assert_eq!(sut.get(&k), Ok(&model[&k]));
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                match model.get(&k) {
                    Some(v) => prop_assert_eq!(sut.get(&k), Ok(v)),
                    None => prop_assert_eq!(sut.get(&k), Err(MapError::KeyNotFound)),
                }
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let got = sut.remove(k.0.as_str());
                let want = model.remove(&k);
                prop_assert_eq!(got, want);
                if got.is_some() {
                    found_removes += 1;
                }
                prop_assert!(!sut.contains_key(&k));
                prop_assert_eq!(sut.capacity(), cap_before, "remove never shrinks");
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                match sut.get_mut(&k) {
                    Ok(vr) => {
                        *vr = vr.saturating_add(d);
                        let mv = model.get_mut(&k).expect("present in model");
                        *mv = mv.saturating_add(d);
                    }
                    Err(MapError::KeyNotFound) => prop_assert!(!model.contains_key(&k)),
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                cleared = accepted_puts - found_removes;
                prop_assert_eq!(sut.capacity(), cap_before, "clear keeps capacity");
            }
            OpI::Iterate => {
                let s_keys: Vec<_> = sut.keys().cloned().collect();
                let unique: BTreeSet<_> = s_keys.iter().cloned().collect();
                prop_assert_eq!(s_keys.len(), unique.len(), "no key appears twice");
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(unique, m_keys);
                prop_assert_eq!(sut.render().lines().count(), model.len());
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.len(), accepted_puts - found_removes - cleared);
        prop_assert!(sut.capacity() >= cap_before, "capacity only grows");
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate puts are rejected and never overwrite.
// - A put whose prospective load reaches the threshold doubles capacity,
//   and every previously present key survives with its value.
// - `get` errors on absence while `remove` returns `None`.
// - `len` equals accepted puts minus found removes minus cleared entries.
// - Iteration yields every live key exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<Key, i32> = ChainedHashMap::with_capacity(cap);
        run_state_machine(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions, where every entry
// shares bucket 0 through every resize.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((cap, pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<Key, i32, ConstBuildHasher> =
            ChainedHashMap::with_capacity_and_hasher(cap, ConstBuildHasher);
        run_state_machine(sut, &pool, ops)?;
    }
}

// Property: growing through many doublings keeps every key with its
// original value and leaves the load factor below the threshold.
proptest! {
    #[test]
    fn prop_growth_preserves_entries(cap in 1usize..=8, n in 0usize..300) {
        let mut m: ChainedHashMap<u32, u32> = ChainedHashMap::with_capacity(cap);
        for k in 0..n as u32 {
            prop_assert!(m.put(k, k.wrapping_mul(7)));
        }
        prop_assert_eq!(m.len(), n);
        prop_assert!(m.capacity() >= cap);
        prop_assert_eq!(m.capacity() % cap, 0);
        prop_assert!((m.capacity() / cap).is_power_of_two());
        prop_assert!(m.load_factor() < LOAD_FACTOR_THRESHOLD);
        for k in 0..n as u32 {
            prop_assert_eq!(m.get(&k), Ok(&k.wrapping_mul(7)));
        }
    }
}
