// HashTable integration test suite.
//
// Each test notes the behavior it checks. Core invariants exercised:
// - Lookup: get returns the most recently inserted value for a key.
// - Size: len counts distinct keys; overwrites and missed removals leave it alone.
// - Removal: a removed key reads as absent afterwards.
// - Growth: entries stay reachable across many doublings.
// - Views: snapshots and borrowing iterators hold exactly the live entries.
use chain_table::{
    ConfigError, HashTable, TableConfig, DEFAULT_CAPACITY, MIN_LOAD_FACTOR,
};
use std::collections::BTreeMap;

fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

// Table pre-filled with keys 1..=10000 mapped to "Value {i}".
fn ten_thousand() -> HashTable<i32, String> {
    init_test_logger();
    let mut map = HashTable::new();
    for i in 1..=10_000 {
        map.insert(i, format!("Value {i}"));
    }
    map
}

// Test: the three-word walkthrough.
// Verifies: get, remove, absent-after-remove and len on a tiny table.
#[test]
fn one_two_three() {
    let mut t = HashTable::new();
    assert_eq!(t.insert("one", 1), None);
    assert_eq!(t.insert("two", 2), None);
    assert_eq!(t.insert("three", 3), None);
    assert_eq!(t.get("one"), Some(&1));
    assert_eq!(t.remove("two"), Some(2));
    assert_eq!(t.get("two"), None);
    assert_eq!(t.len(), 2);
}

#[test]
fn size_after_bulk_insert() {
    let map = ten_thousand();
    assert_eq!(map.len(), 10_000);
    assert!(map.capacity() > DEFAULT_CAPACITY);
}

#[test]
fn get_after_bulk_insert() {
    let map = ten_thousand();
    assert_eq!(map.get(&5000).map(String::as_str), Some("Value 5000"));
    assert_eq!(map.get(&10_001), None);
}

#[test]
fn insert_after_bulk_insert() {
    let mut map = ten_thousand();
    assert_eq!(map.insert(10_001, "Value 10001".to_string()), None);
    assert_eq!(map.get(&10_001).map(String::as_str), Some("Value 10001"));
    assert_eq!(map.len(), 10_001);
}

#[test]
fn remove_after_bulk_insert() {
    let mut map = ten_thousand();
    assert_eq!(map.remove(&5000).as_deref(), Some("Value 5000"));
    assert_eq!(map.get(&5000), None);
    assert_eq!(map.len(), 9_999);
}

#[test]
fn contains_key_after_bulk_insert() {
    let map = ten_thousand();
    assert!(map.contains_key(&5000));
    assert!(!map.contains_key(&10_001));
}

#[test]
fn contains_value_after_bulk_insert() {
    let map = ten_thousand();
    assert!(map.contains_value(&"Value 5000".to_string()));
    assert!(!map.contains_value(&"Value 10001".to_string()));
}

#[test]
fn key_set_after_bulk_insert() {
    let map = ten_thousand();
    let keys = map.to_key_set();
    assert_eq!(keys.len(), map.len());
    assert!(keys.contains(&5000));
    assert!(!keys.contains(&10_001));
}

#[test]
fn values_after_bulk_insert() {
    let map = ten_thousand();
    let values = map.to_values();
    assert_eq!(values.len(), map.len());
    assert!(values.contains(&"Value 5000".to_string()));
    assert!(!values.contains(&"Value 10001".to_string()));
}

#[test]
fn entries_after_bulk_insert() {
    let map = ten_thousand();
    let entries = map.to_entries();
    assert_eq!(entries.len(), map.len());
    assert!(entries.contains(&(5000, "Value 5000".to_string())));
}

#[test]
fn clear_after_bulk_insert() {
    let mut map = ten_thousand();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.get(&1), None);
    assert_eq!(map.get(&5000), None);
}

// Test: every key survives repeated growth.
// Verifies: all 10k keys read back their own value.
#[test]
fn every_key_survives_growth() {
    let map = ten_thousand();
    for i in 1..=10_000 {
        assert_eq!(map.get(&i), Some(&format!("Value {i}")), "key {i}");
    }
}

// Test: insert_all applies pairs in order.
// Verifies: later duplicates win, just like repeated insert calls.
#[test]
fn insert_all_later_duplicates_win() {
    let mut t = HashTable::new();
    t.insert("a", 0);
    t.insert_all(vec![("a", 1), ("b", 2), ("a", 3)]);
    assert_eq!(t.len(), 2);
    assert_eq!(t.get("a"), Some(&3));
    assert_eq!(t.get("b"), Some(&2));

    // Any iterator of pairs works, including another table.
    let other: HashTable<&str, i32> = [("c", 4), ("b", 5)].into_iter().collect();
    t.insert_all(other);
    assert_eq!(t.len(), 3);
    assert_eq!(t.get("b"), Some(&5));
}

// Test: Extend and FromIterator route through insert.
#[test]
fn extend_and_collect() {
    let mut t: HashTable<u8, char> = (0..3).map(|i| (i, 'x')).collect();
    t.extend([(2, 'y'), (3, 'z')]);
    assert_eq!(t.len(), 4);
    assert_eq!(t[&2], 'y');
    assert_eq!(t[&3], 'z');
}

// Test: owning and borrowing iteration.
// Verifies: each entry appears once; `&mut` iteration writes through.
#[test]
fn iteration_covers_live_entries() {
    let mut t = HashTable::new();
    for i in 0..50u32 {
        t.insert(i, i);
    }
    for i in (0..50u32).step_by(2) {
        t.remove(&i);
    }
    for (_, v) in &mut t {
        *v *= 10;
    }
    let borrowed: BTreeMap<u32, u32> = (&t).into_iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(borrowed.len(), 25);
    assert!(borrowed.iter().all(|(k, v)| k % 2 == 1 && *v == k * 10));

    let owned: BTreeMap<u32, u32> = t.into_iter().collect();
    assert_eq!(owned, borrowed);
}

// Test: construction parameters.
// Verifies: invalid configs are rejected; a custom load factor delays growth.
#[test]
fn config_validation_and_load_factor() {
    init_test_logger();
    assert_eq!(
        HashTable::<u32, u32>::with_capacity(0).err(),
        Some(ConfigError::ZeroCapacity)
    );
    let bad = TableConfig::default().with_load_factor(-0.5);
    assert!(matches!(
        HashTable::<u32, u32>::with_config(bad),
        Err(ConfigError::InvalidLoadFactor(_))
    ));

    let cfg = TableConfig::default()
        .with_initial_capacity(4)
        .with_load_factor(2.0);
    let mut t = HashTable::with_config(cfg).unwrap();
    for i in 0..9u32 {
        t.insert(i, ());
    }
    // 8 entries never exceeded 2.0 * 4 before the ninth insert began.
    assert_eq!(t.capacity(), 4);
    t.insert(9, ());
    assert_eq!(t.capacity(), 8);
    assert_eq!(t.load_factor(), 2.0);
}

// Test: the smallest load factor still bounds the bucket array.
// Verifies: vanishing load factors are refused; at the floor, buckets stay
// within a constant multiple of len.
#[test]
fn tiny_load_factor_rejected_and_floor_bounded() {
    let tiny = TableConfig::default().with_load_factor(1e-12);
    assert_eq!(
        HashTable::<u32, u32>::with_config(tiny).err(),
        Some(ConfigError::InvalidLoadFactor(1e-12))
    );

    let cfg = TableConfig::default().with_load_factor(MIN_LOAD_FACTOR);
    let mut t = HashTable::with_config(cfg).unwrap();
    for i in 0..200u32 {
        t.insert(i, i);
        assert!(
            t.capacity() <= 32 * t.len(),
            "capacity {} at len {}",
            t.capacity(),
            t.len()
        );
    }
}

#[test]
fn config_error_messages() {
    assert_eq!(
        ConfigError::ZeroCapacity.to_string(),
        "initial capacity must be positive"
    );
    assert_eq!(
        ConfigError::InvalidLoadFactor(0.0).to_string(),
        "invalid load factor 0: must be finite and at least 0.0625"
    );
}

// Test: Debug output is map-shaped.
#[test]
fn debug_formats_as_map() {
    let mut t = HashTable::new();
    t.insert("k", 1);
    assert_eq!(format!("{:?}", t), r#"{"k": 1}"#);
}

// Test: a nullable key type.
// Verifies: None is stored, found, overwritten and removed like any key.
#[test]
fn option_key_models_null() {
    let mut t: HashTable<Option<String>, &str> = HashTable::new();
    t.insert(None, "null");
    t.insert(Some("x".to_string()), "x");
    assert_eq!(t.get(&None), Some(&"null"));
    assert_eq!(t.insert(None, "null2"), Some("null"));
    assert_eq!(t.len(), 2);
    assert_eq!(t.remove(&None), Some("null2"));
    assert_eq!(t.get(&None), None);
    assert_eq!(t.len(), 1);
}
