//! In-memory key-value area, used as a Web Storage area by the file-backed
//! profile and directly as a `ParamStore` in tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ParamStore, WebStorage};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    /// Byte limit over all keys and values, like a browser storage quota.
    #[serde(skip)]
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            items: BTreeMap::new(),
            quota: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl WebStorage for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if let Some(limit) = self.quota {
            if self.used_bytes_without(key) + key.len() + value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

impl ParamStore for MemoryStore {
    fn store(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.set_item(key, value)
    }

    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get_item(key))
    }

    fn erase(&mut self, key: &str) -> StoreResult<()> {
        self.remove_item(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_read_erase() {
        let mut store = MemoryStore::new();
        store.store("utm_source", "google.com").unwrap();
        assert_eq!(store.read("utm_source").unwrap().as_deref(), Some("google.com"));
        store.erase("utm_source").unwrap();
        assert_eq!(store.read("utm_source").unwrap(), None);
        store.erase("never_set").unwrap();
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let mut store = MemoryStore::with_quota(16);
        store.store("a", "12345").unwrap();
        let err = store.store("b", "0123456789").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { ref key, limit: 16 } if key == "b"));
        // Replacing a value only counts the new one.
        store.store("a", "123456789012345").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut store = MemoryStore::new();
        store.store("ref", "xyz").unwrap();
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"ref":"xyz"}"#);
        let back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
