//! Key-value persistence for games and the game counter.
//!
//! The registry only needs three operations, captured by [`KeyValueStore`].
//! [`MemoryStore`] keeps everything in process; [`SqliteStore`] writes to a
//! single SQLite table through diesel.

mod error;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Port between the registry and whatever holds its data.
///
/// Values are opaque strings. Implementations must make [`increment`]
/// atomic with respect to concurrent callers.
///
/// [`increment`]: KeyValueStore::increment
pub trait KeyValueStore: std::fmt::Debug + Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Atomically bumps the counter under `key` and returns the value it
    /// held before. An absent counter starts at 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored value is not a counter, the
    /// counter is exhausted or the backend fails.
    fn increment(&self, key: &str) -> Result<u64, StoreError>;
}

/// Parses a stored counter value.
fn parse_counter(key: &str, raw: &str) -> Result<u64, StoreError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| StoreError::new(format!("Counter '{}' holds {:?}: {}", key, raw, e)))
}

/// Value a counter holds after handing out `current`.
fn bump_counter(key: &str, current: u64) -> Result<u64, StoreError> {
    current
        .checked_add(1)
        .ok_or_else(|| StoreError::new(format!("Counter '{}' is exhausted", key)))
}
