//! HashTable: bucket array of chain heads over an entry arena.

use crate::config::TableConfig;
use crate::error::ConfigError;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::reentrancy::DebugReentrancy;
use ahash::RandomState;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};

/// Arena key of the next entry in a chain, or of a bucket's head.
type Link = Option<DefaultKey>;

// Fixed seeds keep bucket placement identical from run to run.
const HASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
    next: Link,
}

/// Reduces a full hash to a bucket index for `capacity` buckets.
#[inline]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// A separate-chaining hash table.
///
/// Each bucket holds the head of a singly linked chain of entries whose
/// hashes reduce to that bucket. Entries themselves live in a generational
/// arena and chains link them by arena key, so unlinking and rehashing never
/// move or reallocate an entry.
///
/// The bucket array doubles before an insert whenever `len` already exceeds
/// `load_factor * capacity`. It never shrinks.
///
/// ```
/// use chain_table::HashTable;
///
/// let mut t = HashTable::new();
/// t.insert("one", 1);
/// t.insert("two", 2);
/// t.insert("three", 3);
/// assert_eq!(t.get("one"), Some(&1));
/// assert_eq!(t.remove("two"), Some(2));
/// assert_eq!(t.get("two"), None);
/// assert_eq!(t.len(), 2);
/// ```
pub struct HashTable<K, V> {
    buckets: Vec<Link>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    load_factor: f64,
    hasher: RandomState,
    reentrancy: DebugReentrancy,
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty table with the default capacity and load factor.
    pub fn new() -> Self {
        Self::from_valid_config(TableConfig::default())
    }

    /// Creates an empty table with `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_config(TableConfig::default().with_initial_capacity(capacity))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TableConfig) -> Self {
        trace!(
            "new table: capacity={} load_factor={}",
            config.initial_capacity,
            config.load_factor
        );
        Self {
            buckets: vec![None; config.initial_capacity],
            slots: SlotMap::with_key(),
            load_factor: config.load_factor,
            hasher: RandomState::with_seeds(
                HASH_SEEDS[0],
                HASH_SEEDS[1],
                HASH_SEEDS[2],
                HASH_SEEDS[3],
            ),
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Walks the chain for `hash` and returns the arena key of the entry
    /// whose key equals `q`.
    fn find_slot<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.buckets[bucket_index(hash, self.buckets.len())];
        while let Some(k) = cur {
            let e = &self.slots[k];
            if e.hash == hash && e.key.borrow() == q {
                return Some(k);
            }
            cur = e.next;
        }
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let hash = self.make_hash(q);
        let k = self.find_slot(hash, q)?;
        Some(&self.slots[k].value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_key_value");
        let hash = self.make_hash(q);
        let k = self.find_slot(hash, q)?;
        let e = &self.slots[k];
        Some((&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let hash = self.make_hash(q);
        let k = self.find_slot(hash, q)?;
        Some(&mut self.slots[k].value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        let hash = self.make_hash(q);
        self.find_slot(hash, q).is_some()
    }

    /// Full scan comparing every stored value with `value`.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let _g = self.reentrancy.enter("contains_value");
        self.slots.values().any(|e| e.value == *value)
    }

    /// Inserts `key -> value`, returning the previous value if the key was
    /// already present. An existing entry keeps its key and has only its
    /// value replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.needs_grow() {
            self.grow();
        }

        let _g = self.reentrancy.enter("insert");
        let hash = self.make_hash(&key);
        let idx = bucket_index(hash, self.buckets.len());

        // Every node, the tail included, is compared before appending.
        let mut tail: Link = None;
        let mut cur = self.buckets[idx];
        while let Some(k) = cur {
            let e = &mut self.slots[k];
            if e.hash == hash && e.key == key {
                return Some(core::mem::replace(&mut e.value, value));
            }
            tail = Some(k);
            cur = e.next;
        }

        let k = self.slots.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        match tail {
            Some(t) => self.slots[t].next = Some(k),
            None => self.buckets[idx] = Some(k),
        }
        None
    }

    /// Inserts every pair from `source` in its iteration order; later
    /// duplicates overwrite earlier ones.
    pub fn insert_all<I>(&mut self, source: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in source {
            self.insert(k, v);
        }
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Unlinks the entry for `q` and hands back its owned key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove");
        let hash = self.make_hash(q);
        let idx = bucket_index(hash, self.buckets.len());

        let mut prev: Link = None;
        let mut cur = self.buckets[idx];
        while let Some(k) = cur {
            let e = &self.slots[k];
            let next = e.next;
            if e.hash == hash && e.key.borrow() == q {
                match prev {
                    Some(p) => self.slots[p].next = next,
                    None => self.buckets[idx] = next,
                }
                // Links are consistent again before K/V reach the caller.
                return self.slots.remove(k).map(|e| (e.key, e.value));
            }
            prev = Some(k);
            cur = next;
        }
        None
    }

    /// Removes every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        debug!("clearing table: len={} capacity={}", self.len(), self.capacity());
        self.buckets.fill(None);
        // Drop entries only after every bucket is empty.
        let old = core::mem::take(&mut self.slots);
        drop(old);
    }

    fn needs_grow(&self) -> bool {
        self.len() as f64 > self.load_factor * self.buckets.len() as f64
    }

    /// Doubles the bucket array and relinks every entry into the chain its
    /// cached hash selects for the new capacity. Entries are prepended, so
    /// chain order is not preserved. No user `Hash` impl runs here.
    fn grow(&mut self) {
        let old_cap = self.buckets.len();
        let new_cap = old_cap * 2;
        let mut buckets: Vec<Link> = vec![None; new_cap];
        for (k, e) in self.slots.iter_mut() {
            let idx = bucket_index(e.hash, new_cap);
            e.next = buckets[idx];
            buckets[idx] = Some(k);
        }
        self.buckets = buckets;
        debug!(
            "resized table: len={} capacity {} -> {}",
            self.slots.len(),
            old_cap,
            new_cap
        );
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Owned copy of the current key set. Later changes to the table do not
    /// show up in it and vice versa.
    pub fn to_key_set(&self) -> hashbrown::HashSet<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    /// Owned copy of the current values, one per entry.
    pub fn to_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }

    /// Owned copy of the current `(key, value)` pairs. Keys are unique, so
    /// no pair appears twice.
    pub fn to_entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[cfg(test)]
impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    /// Length of every chain, indexed by bucket.
    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|&head| {
                let mut n = 0;
                let mut cur = head;
                while let Some(k) = cur {
                    n += 1;
                    cur = self.slots[k].next;
                }
                n
            })
            .collect()
    }

    /// Panics unless every arena entry is reachable from exactly one chain,
    /// that chain is the one its hash selects, and the chains hold exactly
    /// `len` entries.
    pub(crate) fn assert_structure(&self) {
        let cap = self.buckets.len();
        assert!(cap > 0, "bucket array must not be empty");
        let mut seen = std::collections::HashSet::new();
        for (idx, &head) in self.buckets.iter().enumerate() {
            let mut cur = head;
            while let Some(k) = cur {
                let e = self.slots.get(k).expect("chain link points at a freed slot");
                assert_eq!(bucket_index(e.hash, cap), idx, "entry chained in the wrong bucket");
                assert_eq!(e.hash, self.make_hash(&e.key), "cached hash is stale");
                assert!(seen.insert(k), "entry reachable twice");
                cur = e.next;
            }
        }
        assert_eq!(seen.len(), self.len(), "chains and arena disagree on len");
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for HashTable<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            slots: self.slots.clone(),
            load_factor: self.load_factor,
            hasher: self.hasher.clone(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K, V> fmt::Debug for HashTable<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two tables are equal when they hold the same keys mapped to equal
/// values, regardless of capacity or chain layout.
impl<K, V> PartialEq for HashTable<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| *v == *ov))
    }
}

impl<K, V> Eq for HashTable<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

impl<K, Q, V> Index<&Q> for HashTable<K, V>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
{
    type Output = V;

    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not present in HashTable"),
        }
    }
}

impl<K, V> Extend<(K, V)> for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.insert_all(iter);
        table
    }
}

impl<K, V> IntoIterator for HashTable<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.slots.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut HashTable<K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
