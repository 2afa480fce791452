use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::context::strip_www;

/// Campaign source key; resolved from the query or, failing that, the external referrer.
pub const UTM_SOURCE: &str = "utm_source";

/// UTM parameters tracked through the include list when `storeUTMs` is on.
pub const TRACKED_UTMS: [&str; 4] = ["utm_medium", "utm_campaign", "utm_term", "utm_content"];

/// Key the external referrer URL is written under.
pub const REFERRER_KEY: &str = "referrer";

pub const DEFAULT_COOKIE_DURATION_DAYS: u32 = 14;

const CONFIG_FILE: &str = "config.toml";

/// Storage backend the capture pass writes into.
///
/// Option strings match the browser API names (`cookies`, `localStorage`,
/// `sessionStorage`). Anything else is kept as `Unrecognized` and binds a
/// backend that does nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageKind {
    #[default]
    Cookies,
    LocalStorage,
    SessionStorage,
    Unrecognized(String),
}

impl StorageKind {
    pub fn as_str(&self) -> &str {
        match self {
            StorageKind::Cookies => "cookies",
            StorageKind::LocalStorage => "localStorage",
            StorageKind::SessionStorage => "sessionStorage",
            StorageKind::Unrecognized(name) => name,
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s {
            "cookies" => StorageKind::Cookies,
            "localStorage" => StorageKind::LocalStorage,
            "sessionStorage" => StorageKind::SessionStorage,
            other => StorageKind::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for StorageKind {
    fn from(s: String) -> Self {
        StorageKind::from_name(&s)
    }
}

impl From<StorageKind> for String {
    fn from(kind: StorageKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `include` list: a query parameter to persist, optionally
/// under a different storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRule {
    pub param: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

impl ParamRule {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            storage: None,
        }
    }

    pub fn aliased(param: impl Into<String>, storage: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            storage: Some(storage.into()),
        }
    }

    /// Key the value is written under: the alias when set and non-empty, else the param name.
    pub fn destination(&self) -> &str {
        self.storage
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.param)
    }
}

/// User-supplied options, any subset of the recognized keys.
///
/// Keys use the option names as written in `config.toml` (`cookieDuration`,
/// `storeUTMs`, ...). Unrecognized keys are kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageKind>,
    /// Cookie lifetime in days; 0 means session cookies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_domain: Option<String>,
    #[serde(default, rename = "storeUTMs", skip_serializing_if = "Option::is_none")]
    pub store_utms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_referrer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<ParamRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

/// Fully resolved configuration for one capture pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreParamsConfig {
    pub storage: StorageKind,
    pub cookie_duration: u32,
    pub cookie_domain: String,
    #[serde(rename = "storeUTMs")]
    pub store_utms: bool,
    pub store_referrer: bool,
    /// User entries first, followed by the tracked UTM entries when `store_utms` is on.
    pub include: Vec<ParamRule>,
    pub exclude: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl StoreParamsConfig {
    /// Shallow merge of `overrides` over the defaults, then derive the computed
    /// values: the cookie domain (from `page_host`) and the UTM include entries.
    pub fn resolve(overrides: ConfigOverrides, page_host: &str) -> Self {
        let store_utms = overrides.store_utms.unwrap_or(true);

        let cookie_domain = overrides
            .cookie_domain
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!(".{}", strip_www(page_host)));

        let mut include = overrides.include.unwrap_or_default();
        if store_utms {
            include.extend(TRACKED_UTMS.iter().copied().map(ParamRule::new));
        }

        Self {
            storage: overrides.storage.unwrap_or_default(),
            cookie_duration: overrides
                .cookie_duration
                .unwrap_or(DEFAULT_COOKIE_DURATION_DAYS),
            cookie_domain,
            store_utms,
            store_referrer: overrides.store_referrer.unwrap_or(true),
            include,
            exclude: overrides.exclude.unwrap_or_default(),
            extra: overrides.extra,
        }
    }

    pub fn is_excluded(&self, param: &str) -> bool {
        self.exclude.iter().any(|e| e == param)
    }
}

/// Path of the user config file, `~/.config/storeparams/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("storeparams")?;
    Ok(xdg_dirs.get_config_home().join(CONFIG_FILE))
}

/// Load overrides from the user config file, or no overrides if it doesn't exist.
pub fn load_or_default() -> Result<ConfigOverrides> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(ConfigOverrides::default());
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<ConfigOverrides> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let overrides: ConfigOverrides =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(overrides)
}
