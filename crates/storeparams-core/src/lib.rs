pub mod config;
pub mod logging;

pub mod capture;
pub mod context;
pub mod error;
pub mod profile;
pub mod storage;

pub use capture::{CaptureReport, StoreParams};
pub use config::{ConfigOverrides, ParamRule, StorageKind, StoreParamsConfig};
pub use context::PageContext;
pub use error::{StoreError, StoreResult};
