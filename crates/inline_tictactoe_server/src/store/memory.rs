//! In-process key-value store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, instrument};

use super::{KeyValueStore, StoreError, bump_counter, parse_counter};

/// Key-value store held in memory.
///
/// Clones share the same map, so one store can be handed to several
/// registries or threads.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating in-memory store");
        Self::default()
    }

    /// Number of stored keys, counter included.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the map lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries()?.len())
    }

    /// Checks whether nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the map lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.entries()?.is_empty())
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::new(format!("Memory store lock poisoned: {}", e)))
    }
}

impl KeyValueStore for MemoryStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    #[instrument(skip(self))]
    fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let mut entries = self.entries()?;
        let current = match entries.get(key) {
            Some(raw) => parse_counter(key, raw)?,
            None => 1,
        };
        let next = bump_counter(key, current)?;
        entries.insert(key.to_string(), next.to_string());
        debug!(key, value = current, "Counter incremented");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("game1").expect("get"), None);
        assert!(store.is_empty().expect("is_empty"));
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("game1", "a").expect("set");
        store.set("game1", "b").expect("set");
        assert_eq!(store.get("game1").expect("get").as_deref(), Some("b"));
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn test_increment_starts_at_one() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("games_increment").expect("increment"), 1);
        assert_eq!(store.increment("games_increment").expect("increment"), 2);
        assert_eq!(
            store.get("games_increment").expect("get").as_deref(),
            Some("3")
        );
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.set("k", "v").expect("set");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("v"));
    }

    #[test]
    fn test_exhausted_counter_is_error() {
        let store = MemoryStore::new();
        let max = u64::MAX.to_string();
        store.set("games_increment", &max).expect("set");
        assert!(store.increment("games_increment").is_err());
        assert_eq!(
            store.get("games_increment").expect("get").as_deref(),
            Some(max.as_str())
        );
    }

    #[test]
    fn test_increment_rejects_non_counter() {
        let store = MemoryStore::new();
        store.set("games_increment", "many").expect("set");
        assert!(store.increment("games_increment").is_err());
    }
}
