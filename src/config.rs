//! Construction parameters for [`HashTable`](crate::HashTable).

use crate::error::ConfigError;

/// Bucket count used by [`HashTable::new`](crate::HashTable::new).
pub const DEFAULT_CAPACITY: usize = 16;

/// Growth threshold used when none is configured.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted load factor. The table settles at roughly
/// `len / load_factor` buckets, so this caps that at 16 buckets per entry.
pub const MIN_LOAD_FACTOR: f64 = 0.0625;

/// Initial bucket count and growth threshold.
///
/// ```
/// use chain_table::{HashTable, TableConfig};
///
/// let cfg = TableConfig::default().with_initial_capacity(64);
/// let table: HashTable<u32, &str> = HashTable::with_config(cfg).unwrap();
/// assert_eq!(table.capacity(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks that the capacity is positive and the load factor is finite
    /// and at least [`MIN_LOAD_FACTOR`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.load_factor.is_finite() || self.load_factor < MIN_LOAD_FACTOR {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }
}
