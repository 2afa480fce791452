//! The attribution decision procedure: which keys to erase, which to write.

use std::fmt;

use crate::config::{StoreParamsConfig, REFERRER_KEY, TRACKED_UTMS, UTM_SOURCE};
use crate::context::{strip_www, PageContext};
use crate::error::StoreResult;
use crate::storage::ParamStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Erase(String),
    Store { key: String, value: String },
}

impl StoreOp {
    fn store(key: &str, value: impl Into<String>) -> Self {
        StoreOp::Store {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            StoreOp::Erase(key) | StoreOp::Store { key, .. } => key,
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOp::Erase(key) => write!(f, "erase {key}"),
            StoreOp::Store { key, value } => write!(f, "store {key}={value}"),
        }
    }
}

/// What a capture pass did to the backend, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureReport {
    pub erased: Vec<String>,
    pub written: Vec<(String, String)>,
}

/// Ordered operations for one capture pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturePlan {
    ops: Vec<StoreOp>,
}

impl CapturePlan {
    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Executes the operations in order. The first backend error stops the
    /// pass and is returned; operations already applied stay applied.
    pub fn apply(&self, store: &mut dyn ParamStore) -> StoreResult<CaptureReport> {
        let mut report = CaptureReport::default();
        for op in &self.ops {
            tracing::trace!(%op, "apply");
            match op {
                StoreOp::Erase(key) => {
                    store.erase(key)?;
                    report.erased.push(key.clone());
                }
                StoreOp::Store { key, value } => {
                    store.store(key, value)?;
                    report.written.push((key.clone(), value.clone()));
                }
            }
        }
        Ok(report)
    }
}

/// Decides the capture pass for `ctx` under `config`.
///
/// Steps, in order:
/// 1. Flush `utm_source` and the tracked UTMs when any tracked UTM is in the
///    query or the visitor came from another host, so a new campaign replaces
///    the old one instead of merging with it.
/// 2. Write `utm_source` from the query, else from the external referrer's
///    host (minus `www.`), unless excluded.
/// 3. Write every included parameter present in the query and not excluded,
///    under its alias if it has one. Later entries overwrite earlier ones.
/// 4. Write the external referrer URL under `referrer`.
///
/// Steps 1 and 2 only run with `storeUTMs`, step 4 only with `storeReferrer`.
pub fn plan_capture(config: &StoreParamsConfig, ctx: &PageContext) -> CapturePlan {
    let mut ops = Vec::new();
    let external = ctx.external_referrer();

    if config.store_utms {
        let fresh_tags = TRACKED_UTMS.iter().any(|p| ctx.query_has(p));
        if fresh_tags || external.is_some() {
            ops.push(StoreOp::Erase(UTM_SOURCE.to_string()));
            ops.extend(TRACKED_UTMS.iter().map(|p| StoreOp::Erase(p.to_string())));
        }

        if !config.is_excluded(UTM_SOURCE) {
            let source = ctx.query_get(UTM_SOURCE).or_else(|| {
                external.map(|r| strip_www(r.host_str().unwrap_or("")).to_string())
            });
            if let Some(source) = source {
                ops.push(StoreOp::store(UTM_SOURCE, source));
            }
        }
    }

    for rule in &config.include {
        if config.is_excluded(&rule.param) {
            continue;
        }
        if let Some(value) = ctx.query_get(&rule.param) {
            ops.push(StoreOp::store(rule.destination(), value));
        }
    }

    if config.store_referrer {
        if let Some(referrer) = external {
            ops.push(StoreOp::store(REFERRER_KEY, referrer.as_str()));
        }
    }

    CapturePlan { ops }
}
