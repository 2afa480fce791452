//! Pass-through adapter over a Web Storage area.

use std::fmt;

use super::{ParamStore, WebStorage};
use crate::error::StoreResult;

/// Which Web Storage area an adapter is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    Local,
    Session,
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageScope::Local => f.write_str("localStorage"),
            StorageScope::Session => f.write_str("sessionStorage"),
        }
    }
}

/// `ParamStore` over `localStorage` or `sessionStorage`: `setItem`, `getItem`
/// and `removeItem` by key name.
pub struct WebStorageStore<'a> {
    storage: &'a mut dyn WebStorage,
    scope: StorageScope,
}

impl<'a> WebStorageStore<'a> {
    pub fn new(storage: &'a mut dyn WebStorage, scope: StorageScope) -> Self {
        Self { storage, scope }
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }
}

impl ParamStore for WebStorageStore<'_> {
    fn store(&mut self, key: &str, value: &str) -> StoreResult<()> {
        tracing::trace!(scope = %self.scope, key, "setItem");
        self.storage.set_item(key, value)
    }

    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.storage.get_item(key))
    }

    fn erase(&mut self, key: &str) -> StoreResult<()> {
        tracing::trace!(scope = %self.scope, key, "removeItem");
        self.storage.remove_item(key);
        Ok(())
    }
}
