//! Errors raised by storage backends.

use thiserror::Error;

/// Failure reported by a storage backend while storing, reading or erasing a key.
///
/// The capture pass never swallows these; they propagate to whoever constructed
/// the [`StoreParams`](crate::StoreParams) instance.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cookie rejected ({name:?}): {reason}")]
    CookieRejected { name: String, reason: String },

    #[error("storage quota exceeded writing {key:?} (limit {limit} bytes)")]
    QuotaExceeded { key: String, limit: usize },
}

pub type StoreResult<T> = Result<T, StoreError>;
