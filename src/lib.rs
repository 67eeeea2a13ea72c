//! chain-table: a separate-chaining hash table built from a bucket array,
//! singly linked chains, and load-factor driven growth.
//!
//! Internal Design:
//!
//! Summary
//! - `HashTable<K, V>` owns a `Vec` of bucket heads and a generational
//!   arena (`slotmap`) of entries. A bucket head is the arena key of the
//!   first entry in its chain; each entry stores the arena key of the next.
//! - Lookups hash the key, reduce the hash modulo the bucket count, and
//!   walk one chain comparing keys with `Eq`.
//! - Inserts append new keys at the chain tail and overwrite the value of
//!   an existing key in place, returning the old value.
//! - Removal unlinks by rewriting the predecessor's link (or the bucket
//!   head) and frees the arena slot.
//!
//! Growth
//! - Before every insert, if `len > load_factor * capacity` the bucket
//!   array doubles. Default capacity is 16, default load factor 0.75.
//! - Every entry caches its 64-bit hash, so growth only re-reduces stored
//!   hashes and relinks entries (prepending to each new chain). Keys are
//!   never hashed again after insertion.
//! - The table never shrinks; `clear` keeps the current bucket count.
//!
//! Hashing
//! - Keys are hashed with a fixed-seed `ahash::RandomState`, so placement is
//!   deterministic across runs. The hash is reduced with an unsigned modulo;
//!   there is no sign handling.
//! - A nullable key is expressed as `HashTable<Option<K>, V>`; `None` is an
//!   ordinary key equal only to itself.
//!
//! Views
//! - `iter`, `keys`, `values` and their `_mut` forms borrow the table.
//! - `to_key_set`, `to_values`, `to_entries` return owned snapshots that
//!   are independent of the table once built.
//!
//! Reentrancy
//! - Chain walks call user `Eq`/`Hash`. In debug builds a guard panics if
//!   such a call re-enters the same table; release builds pay nothing.
//!
//! Notes and non-goals
//! - Single-threaded; callers serialize access themselves.
//! - No ordering guarantees, no shrinking, no pluggable hasher.
//! - Construction rejects a zero capacity, or a load factor that is not
//!   finite or is below [`MIN_LOAD_FACTOR`], with [`ConfigError`]; no other
//!   operation can fail.

mod config;
mod error;
mod hash_table;
mod hash_table_proptest;
pub mod iter;
mod reentrancy;

// Public surface
pub use config::{TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, MIN_LOAD_FACTOR};
pub use error::ConfigError;
pub use hash_table::HashTable;
