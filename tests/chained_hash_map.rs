// ChainedHashMap integration test suite.
//
// Each test documents what behavior is being verified. The core contract
// exercised:
// - Insert-if-absent: put on an existing key is a no-op returning false.
// - Absence: get fails with KeyNotFound, remove returns None.
// - Growth: a put whose prospective load reaches 0.85 doubles capacity
//   first, and no entry is lost or duplicated.
// - Clear: drops entries, keeps capacity.
// - Render: values one per line, bucket index order, newest-first.
use chained_hashmap::{Builder, ChainedHashMap, MapError, DEFAULT_CAPACITY, LOAD_FACTOR_THRESHOLD};
use std::fmt;
use std::hash::{BuildHasherDefault, Hasher};

/// Maps an integer key to itself so bucket placement is predictable.
#[derive(Default)]
struct IdentityHasher(u64);
impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 << 8) | u64::from(*b);
        }
    }
    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
    fn finish(&self) -> u64 {
        self.0
    }
}
type Identity = BuildHasherDefault<IdentityHasher>;

fn identity_map<V>(capacity: usize) -> ChainedHashMap<u64, V, Identity> {
    Builder::new()
        .capacity(capacity)
        .hasher(Identity::default())
        .build()
}

// Test: the reference walkthrough.
// Verifies: put/get/duplicate/remove/clear on a capacity-4 map.
#[test]
fn reference_scenario() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_capacity(4);
    assert!(m.put("a".to_string(), 1));
    assert!(m.put("b".to_string(), 2));
    assert!(m.put("c".to_string(), 3));
    assert_eq!(m.len(), 3);
    assert_eq!(m.get("b"), Ok(&2));

    assert!(!m.put("a".to_string(), 9));
    assert_eq!(m.get("a"), Ok(&1));

    assert_eq!(m.remove("b"), Some(2));
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("b"), Err(MapError::KeyNotFound));

    m.clear();
    assert_eq!(m.len(), 0);
    assert!(!m.contains_key("a"));
}

// Test: defaults.
// Verifies: the default capacity and the exposed threshold value.
#[test]
fn defaults() {
    let m: ChainedHashMap<String, i32> = ChainedHashMap::new();
    assert_eq!(m.capacity(), DEFAULT_CAPACITY);
    assert_eq!(DEFAULT_CAPACITY, 10);
    assert_eq!(LOAD_FACTOR_THRESHOLD, 0.85);
    assert_eq!(ChainedHashMap::<String, i32>::LOAD_FACTOR_THRESHOLD, 0.85);
    let d: ChainedHashMap<String, i32> = ChainedHashMap::default();
    assert_eq!(d.capacity(), DEFAULT_CAPACITY);
    assert_eq!(d.load_factor(), 0.0);
}

// Test: crossing the threshold.
// Assumes: default capacity 10, so the 9th put sees 9 / 10 >= 0.85.
// Verifies: capacity exactly doubles and every earlier key survives.
#[test]
fn resize_preserves_all_entries() {
    let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new();
    for i in 0..8 {
        assert!(m.put(format!("k{i}"), i));
    }
    assert_eq!(m.capacity(), 10);
    assert!(m.put("k8".to_string(), 8));
    assert_eq!(m.capacity(), 20);
    assert_eq!(m.len(), 9);
    for i in 0..9 {
        assert_eq!(m.get(format!("k{i}").as_str()), Ok(&i));
    }
    assert_eq!(m.keys().count(), 9);
}

// Test: growth is a pure doubling sequence.
// Verifies: capacity after n inserts into capacity 1 follows 1, 2, 4, ...
#[test]
fn capacity_doubles_from_one() {
    let mut m: ChainedHashMap<u32, ()> = ChainedHashMap::with_capacity(1);
    let mut seen = vec![m.capacity()];
    for k in 0..40 {
        m.put(k, ());
        if *seen.last().unwrap() != m.capacity() {
            seen.push(m.capacity());
        }
    }
    assert_eq!(seen, vec![1, 2, 4, 8, 16, 32, 64]);
}

// Test: removal never shrinks.
// Verifies: capacity is unchanged after removing everything.
#[test]
fn remove_never_shrinks() {
    let mut m: ChainedHashMap<u32, u32> = ChainedHashMap::with_capacity(2);
    for k in 0..50 {
        m.put(k, k);
    }
    let cap = m.capacity();
    for k in 0..50 {
        assert_eq!(m.remove(&k), Some(k));
    }
    assert!(m.is_empty());
    assert_eq!(m.capacity(), cap);
    assert_eq!(m.remove(&0), None);
}

// Test: clear semantics.
// Verifies: size resets, capacity stays, later puts work.
#[test]
fn clear_resets_without_shrinking() {
    let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_capacity(2);
    for i in 0..20 {
        m.put(i.to_string(), i);
    }
    let cap = m.capacity();
    m.clear();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), cap);
    assert_eq!(m.render(), "");
    assert!(m.put("7".to_string(), 70));
    assert_eq!(m.get("7"), Ok(&70));
    assert_eq!(m.capacity(), cap);
}

// Test: render order before and after a resize.
// Assumes: identity hashing; keys 1 and 9 share bucket 1 at capacity 4 and 8.
// Verifies: newest-first chains, and the chain reversal caused by rehashing.
#[test]
fn render_follows_bucket_order_and_rehash_reversal() {
    let mut m = identity_map::<&str>(4);
    m.put(1, "one");
    m.put(9, "nine");
    m.put(2, "two");
    assert_eq!(m.render(), "nine\none\ntwo\n");

    m.put(3, "three");
    assert_eq!(m.capacity(), 8);
    assert_eq!(m.render(), "one\nnine\ntwo\nthree\n");
    assert_eq!(format!("{m}"), m.render());
}

// Test: iteration matches render order.
#[test]
fn iteration_matches_render_order() {
    let mut m = identity_map::<u64>(16);
    for k in [5, 21, 3, 37, 0] {
        m.put(k, k * 100);
    }
    let keys: Vec<u64> = m.keys().copied().collect();
    assert_eq!(keys, vec![0, 3, 37, 21, 5]);
    let values: Vec<u64> = (&m).into_iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![0, 300, 3700, 2100, 500]);
    for (_, v) in &mut m {
        *v += 1;
    }
    assert_eq!(m.get(&37), Ok(&3701));
    let owned: Vec<(u64, u64)> = m.into_iter().collect();
    assert_eq!(owned[0], (0, 1));
    assert_eq!(owned.len(), 5);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Trait {
    Strength,
    Intelligence,
    Speed,
}

#[derive(Clone, Debug, PartialEq)]
struct Hero {
    name: String,
    description: String,
    trait_: Trait,
    rating: u8,
}

impl fmt::Display for Hero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| Name: {} | Trait: {:?} | Rating: {} |\n| Description: {} |",
            self.name, self.trait_, self.rating, self.description
        )
    }
}

fn hero(name: &str, trait_: Trait, rating: u8) -> Hero {
    Hero {
        name: name.to_string(),
        description: format!("{name} is a hero"),
        trait_,
        rating,
    }
}

// Test: catalog-style workload with record values keyed by name.
// Verifies: duplicate names are refused, records can be edited in place,
// filtered sub-maps can be collected, and the listing covers every record.
#[test]
fn catalog_workload() {
    let mut dex: ChainedHashMap<String, Hero> = ChainedHashMap::new();
    let roster = [
        hero("Normal man", Trait::Strength, 60),
        hero("Quick lass", Trait::Speed, 88),
        hero("Brainiac", Trait::Intelligence, 95),
        hero("Muscle", Trait::Strength, 71),
    ];
    for h in roster.iter().cloned() {
        assert!(dex.put(h.name.clone(), h));
    }
    assert!(!dex.put("Muscle".to_string(), hero("Muscle", Trait::Speed, 50)));
    assert_eq!(dex.get("Muscle").map(|h| h.trait_), Ok(Trait::Strength));

    dex.get_mut("Normal man")
        .expect("present")
        .description
        .push_str(", mostly");
    assert!(dex.get("Normal man").unwrap().description.ends_with("mostly"));

    let strong: ChainedHashMap<String, Hero> = dex
        .iter()
        .filter(|(_, h)| h.trait_ == Trait::Strength)
        .map(|(k, h)| (k.clone(), h.clone()))
        .collect();
    assert_eq!(strong.len(), 2);
    assert!(strong.contains_key("Muscle"));
    assert!(!strong.contains_key("Brainiac"));

    let listing = dex.render();
    assert_eq!(listing.lines().count(), 2 * dex.len());
    for h in &roster {
        assert!(listing.contains(&format!("| Name: {} |", h.name)));
    }

    assert_eq!(dex.remove("Quick lass").map(|h| h.rating), Some(88));
    assert_eq!(dex.remove("Quick lass"), None);
    assert_eq!(dex.len(), 3);
}

// Test: try_put error surface.
// Verifies: the rejected pair comes back and the error is displayable.
#[test]
fn try_put_reports_duplicate() {
    let mut m: ChainedHashMap<&str, i32> = ChainedHashMap::new();
    m.try_put("x", 1).expect("first insert");
    let err = m.try_put("x", 2).unwrap_err();
    assert_eq!(err.to_string(), "key already present");
    assert_eq!(*err.key(), "x");
    assert_eq!(err.into_inner(), ("x", 2));
    assert_eq!(m.get("x"), Ok(&1));
}
