//! File-backed browser profile: a cookie jar plus local and session storage.
//!
//! Plays the host environment for the CLI, which has no real browser. The
//! profile is saved as JSON under `~/.local/share/storeparams/profile.json`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::storage::{BrowserHost, CookieDocument, MemoryStore, WebStorage};

const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// None for session cookies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

/// Cookies keyed by name, emulating `document.cookie`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar {
    cookies: BTreeMap<String, StoredCookie>,
}

impl CookieJar {
    pub fn get(&self, name: &str) -> Option<&StoredCookie> {
        self.cookies.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredCookie)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drops expired cookies, and session cookies too when `end_session` is set.
    fn purge(&mut self, end_session: bool) {
        let now = Utc::now();
        self.cookies
            .retain(|_, c| !c.is_expired(now) && !(end_session && c.expires.is_none()));
    }
}

fn parse_expires(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

impl CookieDocument for CookieJar {
    fn cookie_string(&self) -> String {
        let now = Utc::now();
        self.cookies
            .iter()
            .filter(|(_, c)| !c.is_expired(now))
            .map(|(name, c)| format!("{name}={}", c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn set_cookie(&mut self, assignment: &str) -> StoreResult<()> {
        let mut parts = assignment.split(';');
        let pair = parts.next().unwrap_or_default();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| StoreError::CookieRejected {
                name: pair.trim().to_string(),
                reason: "missing '='".into(),
            })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::CookieRejected {
                name: String::new(),
                reason: "empty cookie name".into(),
            });
        }

        let mut cookie = StoredCookie {
            value: value.trim().to_string(),
            domain: None,
            path: None,
            expires: None,
        };
        for attr in parts {
            let (key, val) = attr.split_once('=').unwrap_or((attr, ""));
            match key.trim().to_ascii_lowercase().as_str() {
                "expires" => {
                    cookie.expires = parse_expires(val);
                    if cookie.expires.is_none() {
                        tracing::debug!(cookie = name, expires = val, "unparseable expires, keeping as session cookie");
                    }
                }
                "domain" => cookie.domain = Some(val.trim().to_string()),
                "path" => cookie.path = Some(val.trim().to_string()),
                _ => {}
            }
        }

        if cookie.is_expired(Utc::now()) {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_string(), cookie);
        }
        Ok(())
    }
}

/// Browser state persisted between CLI invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserProfile {
    #[serde(default)]
    pub cookies: CookieJar,
    #[serde(default)]
    pub local: MemoryStore,
    #[serde(default)]
    pub session: MemoryStore,
}

impl BrowserProfile {
    /// Load a profile, or an empty one if `path` doesn't exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no profile at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("read profile {}", path.display()))?;
        let mut profile: BrowserProfile = serde_json::from_str(&data)
            .with_context(|| format!("parse profile {}", path.display()))?;
        profile.cookies.purge(false);
        Ok(profile)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create profile dir {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write profile {}", path.display()))?;
        Ok(())
    }

    /// Closes the browsing session: session storage and session cookies are dropped.
    pub fn end_session(&mut self) {
        self.session.clear();
        self.cookies.purge(true);
    }
}

impl BrowserHost for BrowserProfile {
    fn cookie_document(&mut self) -> &mut dyn CookieDocument {
        &mut self.cookies
    }

    fn local_storage(&mut self) -> &mut dyn WebStorage {
        &mut self.local
    }

    fn session_storage(&mut self) -> &mut dyn WebStorage {
        &mut self.session
    }
}

/// Default profile location, `~/.local/share/storeparams/profile.json`.
pub fn profile_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("storeparams")?;
    Ok(xdg_dirs.get_data_home().join(PROFILE_FILE))
}
