//! Attribution capture: resolve the config, bind a backend, run one pass.

mod plan;

pub use plan::{plan_capture, CapturePlan, CaptureReport, StoreOp};

use crate::config::{ConfigOverrides, StoreParamsConfig};
use crate::context::PageContext;
use crate::error::StoreResult;
use crate::storage::{select_backend, BrowserHost, ParamStore};

type CaptureCallback = Box<dyn FnOnce(&CaptureReport)>;

/// Attribution captured for one page load.
///
/// Construction runs the capture pass to completion; afterwards the instance
/// only serves reads from the bound backend.
pub struct StoreParams<'a> {
    config: StoreParamsConfig,
    store: Box<dyn ParamStore + 'a>,
    report: CaptureReport,
}

impl<'a> StoreParams<'a> {
    /// Resolves `overrides` against the page, binds the configured backend on
    /// `host` and runs the capture pass.
    pub fn new(
        overrides: ConfigOverrides,
        ctx: &PageContext,
        host: &'a mut dyn BrowserHost,
    ) -> StoreResult<Self> {
        Self::builder(overrides).capture(ctx, host)
    }

    pub fn builder(overrides: ConfigOverrides) -> StoreParamsBuilder {
        StoreParamsBuilder {
            overrides,
            callback: None,
        }
    }

    /// Value stored under `key`, or None.
    pub fn read(&self, key: &str) -> StoreResult<Option<String>> {
        self.store.read(key)
    }

    pub fn config(&self) -> &StoreParamsConfig {
        &self.config
    }

    /// Erases and writes performed by the capture pass.
    pub fn report(&self) -> &CaptureReport {
        &self.report
    }
}

pub struct StoreParamsBuilder {
    overrides: ConfigOverrides,
    callback: Option<CaptureCallback>,
}

impl StoreParamsBuilder {
    /// Called once with the report after a successful pass.
    pub fn on_capture(mut self, callback: impl FnOnce(&CaptureReport) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Runs the pass against the backend `config.storage` selects on `host`.
    pub fn capture<'a>(
        self,
        ctx: &PageContext,
        host: &'a mut dyn BrowserHost,
    ) -> StoreResult<StoreParams<'a>> {
        let config = StoreParamsConfig::resolve(self.overrides, ctx.host());
        let store = select_backend(&config, host);
        run(config, ctx, store, self.callback)
    }

    /// Runs the pass against an explicitly provided store, ignoring `storage`.
    pub fn capture_into<'a>(
        self,
        ctx: &PageContext,
        store: Box<dyn ParamStore + 'a>,
    ) -> StoreResult<StoreParams<'a>> {
        let config = StoreParamsConfig::resolve(self.overrides, ctx.host());
        run(config, ctx, store, self.callback)
    }
}

fn run<'a>(
    config: StoreParamsConfig,
    ctx: &PageContext,
    mut store: Box<dyn ParamStore + 'a>,
    callback: Option<CaptureCallback>,
) -> StoreResult<StoreParams<'a>> {
    let plan = plan_capture(&config, ctx);
    let report = plan.apply(store.as_mut())?;

    tracing::info!(
        storage = %config.storage,
        host = ctx.host(),
        erased = report.erased.len(),
        written = report.written.len(),
        "attribution captured"
    );

    if let Some(callback) = callback {
        callback(&report);
    }

    Ok(StoreParams {
        config,
        store,
        report,
    })
}
