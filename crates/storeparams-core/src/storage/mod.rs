//! Key-value storage backends the capture pass writes into.
//!
//! [`ParamStore`] is what the capture pass sees. The browser-facing pieces
//! ([`CookieDocument`], [`WebStorage`], [`BrowserHost`]) are supplied by the
//! host environment; the adapters here bind one of them to a `ParamStore`.

mod cookie;
mod memory;
mod noop;
mod web_storage;

pub use cookie::CookieStore;
pub use memory::MemoryStore;
pub use noop::NoopStore;
pub use web_storage::{StorageScope, WebStorageStore};

use crate::config::{StorageKind, StoreParamsConfig};
use crate::error::StoreResult;

/// Flat string key-value store used by the capture pass.
pub trait ParamStore {
    fn store(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    fn erase(&mut self, key: &str) -> StoreResult<()>;
}

/// The page's cookie string, as exposed by `document.cookie`.
pub trait CookieDocument {
    /// All visible cookies as `name=value` pairs joined by `; `.
    fn cookie_string(&self) -> String;
    /// Applies one cookie assignment (`name=value; expires=...; domain=...; path=...`).
    fn set_cookie(&mut self, assignment: &str) -> StoreResult<()>;
}

/// A Web Storage area (`localStorage` or `sessionStorage`).
pub trait WebStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&mut self, key: &str);
}

/// Host environment providing the browser storage mechanisms.
pub trait BrowserHost {
    fn cookie_document(&mut self) -> &mut dyn CookieDocument;
    fn local_storage(&mut self) -> &mut dyn WebStorage;
    fn session_storage(&mut self) -> &mut dyn WebStorage;
}

/// Binds the backend named by `config.storage` to the host's storage mechanism.
///
/// Unrecognized storage kinds get a [`NoopStore`]: nothing is written and every
/// read comes back empty.
pub fn select_backend<'h>(
    config: &StoreParamsConfig,
    host: &'h mut dyn BrowserHost,
) -> Box<dyn ParamStore + 'h> {
    match &config.storage {
        StorageKind::Cookies => Box::new(CookieStore::new(
            host.cookie_document(),
            config.cookie_domain.clone(),
            config.cookie_duration,
        )),
        StorageKind::LocalStorage => Box::new(WebStorageStore::new(
            host.local_storage(),
            StorageScope::Local,
        )),
        StorageKind::SessionStorage => Box::new(WebStorageStore::new(
            host.session_storage(),
            StorageScope::Session,
        )),
        StorageKind::Unrecognized(name) => {
            tracing::warn!(storage = %name, "unrecognized storage backend, nothing will be stored");
            Box::new(NoopStore)
        }
    }
}
