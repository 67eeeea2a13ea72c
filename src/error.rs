//! Errors reported when building a table.

use thiserror::Error;

/// Rejected table configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A table needs at least one bucket.
    #[error("initial capacity must be positive")]
    ZeroCapacity,

    /// Load factor must be finite and at least `MIN_LOAD_FACTOR`.
    #[error(
        "invalid load factor {}: must be finite and at least {}",
        .0,
        crate::config::MIN_LOAD_FACTOR
    )]
    InvalidLoadFactor(f64),
}
