#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check the
// bucket/chain structure, which the public API does not expose.

use crate::hash_table::HashTable;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

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

// Key whose hash only sees the string length, so most keys share a chain.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd)]
struct Crowded(String);
impl fmt::Debug for Crowded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl Hash for Crowded {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    InsertAll(Vec<(usize, i32)>),
    Remove(usize),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    Mutate(usize, i32),
    Clear,
    Snapshot,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            1 => proptest::collection::vec((idx.clone(), -4i32..4), 0..6).prop_map(OpI::InsertAll),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (-4i32..4).prop_map(OpI::ContainsValue),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Snapshot),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives the table and a std HashMap model through the same operations.
// `wrap` turns a pool string into the key type under test.
fn run_scenario<K>(
    capacity: usize,
    pool: &[String],
    ops: Vec<OpI>,
    wrap: fn(&str) -> K,
) -> Result<(), TestCaseError>
where
    K: Clone + Eq + Hash + Ord + fmt::Debug,
{
    let mut sut: HashTable<K, i32> = HashTable::with_capacity(capacity).unwrap();
    let mut model: HashMap<K, i32> = HashMap::new();
    let mut last_cap = sut.capacity();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = wrap(&pool[i]);
                let prev = sut.insert(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                prop_assert_eq!(sut.get(&k), Some(&v));
            }
            OpI::InsertAll(pairs) => {
                let pairs: Vec<(K, i32)> = pairs.into_iter().map(|(i, v)| (wrap(&pool[i]), v)).collect();
                sut.insert_all(pairs.clone());
                model.extend(pairs);
            }
            OpI::Remove(i) => {
                let k = wrap(&pool[i]);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert!(sut.get(&k).is_none());
            }
            OpI::Get(i) => {
                let k = wrap(&pool[i]);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            OpI::Contains(s) => {
                let k = wrap(&s);
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            OpI::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|&mv| mv == v));
            }
            OpI::Mutate(i, d) => {
                let k = wrap(&pool[i]);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m),
                }
            }
            OpI::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap);
            }
            OpI::Snapshot => {
                let keys: BTreeSet<K> = sut.to_key_set().into_iter().collect();
                let m_keys: BTreeSet<K> = model.keys().cloned().collect();
                prop_assert_eq!(keys, m_keys);

                let mut entries = sut.to_entries();
                entries.sort();
                let mut m_entries: Vec<(K, i32)> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                m_entries.sort();
                prop_assert_eq!(entries, m_entries);

                let mut values = sut.to_values();
                values.sort();
                let mut m_values: Vec<i32> = model.values().copied().collect();
                m_values.sort();
                prop_assert_eq!(values, m_values);
            }
        }

        // Post-conditions after each op
        // 1) Chains hold exactly the live entries, each in its hash's bucket.
        sut.assert_structure();
        prop_assert_eq!(sut.chain_lengths().iter().sum::<usize>(), model.len());
        // 2) Size parity
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        // 3) Growth only, by doubling
        let cap = sut.capacity();
        prop_assert!(
            cap % last_cap == 0 && (cap / last_cap).is_power_of_two(),
            "capacity {} -> {}",
            last_cap,
            cap
        );
        last_cap = cap;
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert returns the previous value exactly when the key existed.
// - get/contains_key/contains_value parity with the model.
// - remove returns the model's value and leaves the key absent.
// - snapshots hold exactly the live keys, values and pairs.
// - every entry is reachable from the bucket its hash selects; len parity.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(cap in 1usize..=16, (pool, ops) in arb_scenario()) {
        run_scenario(cap, &pool, ops, |s: &str| Key(s.to_string()))?;
    }
}

// Property: Same state-machine invariants when keys crowd into a handful of
// long chains. This stresses chain walks, tail appends and unlinking from
// every chain position.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(cap in 1usize..=16, (pool, ops) in arb_scenario()) {
        run_scenario(cap, &pool, ops, |s: &str| Crowded(s.to_string()))?;
    }
}

// Property: borrowed lookups with &str agree with owned-key lookups.
proptest! {
    #[test]
    fn prop_borrowed_lookup(keys in proptest::collection::hash_set("[a-z]{1,4}", 0..40), probe in "[a-z]{1,4}") {
        let mut t: HashTable<Key, usize> = HashTable::new();
        for (i, k) in keys.iter().enumerate() {
            t.insert(Key(k.clone()), i);
        }
        prop_assert_eq!(t.contains_key(probe.as_str()), keys.contains(&probe));
        prop_assert_eq!(t.get(probe.as_str()), t.get(&Key(probe.clone())));
    }
}
