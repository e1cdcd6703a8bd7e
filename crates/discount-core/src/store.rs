//! # Settings Store
//!
//! The host platform owns a key/value settings registry. This module defines
//! the seam the core reads and writes through, plus an in-memory
//! implementation used by tests and embedders without their own registry.
//!
//! Values are `serde_json::Value` because host registries are loosely typed:
//! the same key may hold `["3", "7"]` on one install and `[3, 7]` on another.
//! [`crate::config::DiscountConfig::load`] is responsible for reading them
//! leniently.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Read/write access to the host's settings registry.
///
/// Implementations must be cheap to read: the price hook loads a config
/// snapshot on every call.
pub trait SettingsStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value);

    /// Returns the values for `keys`, in order, as one consistent read.
    ///
    /// The default reads key by key; stores that can should override it so
    /// a concurrent [`SettingsStore::set_many`] is never seen half applied.
    fn get_many(&self, keys: &[&str]) -> Vec<Option<Value>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Stores every entry as one write.
    ///
    /// The default writes key by key; see [`SettingsStore::get_many`].
    fn set_many(&self, entries: Vec<(&str, Value)>) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }
}

/// A `SettingsStore` backed by a map behind an `RwLock`.
///
/// ## Thread Safety
/// Price lookups take the read lock once per snapshot; the admin save action
/// takes the write lock once for all keys. A poisoned lock is recovered
/// rather than propagated; every write completes while holding the lock.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: RwLock<BTreeMap<String, Value>>,
}

impl InMemorySettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with the given entries.
    pub fn with_values<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let values = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        InMemorySettingsStore {
            values: RwLock::new(values),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn get_many(&self, keys: &[&str]) -> Vec<Option<Value>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        keys.iter().map(|key| values.get(*key).cloned()).collect()
    }

    fn set_many(&self, entries: Vec<(&str, Value)>) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            values.insert(key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_and_set() {
        let store = InMemorySettingsStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("missing"), None);

        store.set("custom_discount_percentage", json!(10));
        assert_eq!(store.get("custom_discount_percentage"), Some(json!(10)));

        store.set("custom_discount_percentage", json!("15"));
        assert_eq!(store.get("custom_discount_percentage"), Some(json!("15")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_with_values() {
        let store = InMemorySettingsStore::with_values([("a", json!(1)), ("b", json!([2, 3]))]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b"), Some(json!([2, 3])));
    }

    #[test]
    fn test_batch_read_and_write() {
        let store = InMemorySettingsStore::new();
        store.set_many(vec![("a", json!(1)), ("b", json!("two"))]);

        assert_eq!(
            store.get_many(&["b", "missing", "a"]),
            vec![Some(json!("two")), None, Some(json!(1))]
        );
        assert_eq!(store.len(), 2);
    }
}
