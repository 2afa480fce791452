//! `storeparams capture <url>` – run one capture pass and print what changed.

use anyhow::{Context, Result};
use storeparams_core::config::ConfigOverrides;
use storeparams_core::profile::BrowserProfile;
use storeparams_core::{PageContext, StoreParams};

pub fn run_capture(
    browser: &mut BrowserProfile,
    overrides: ConfigOverrides,
    url: &str,
    referrer: Option<&str>,
) -> Result<()> {
    let ctx = PageContext::new(url, referrer).with_context(|| format!("invalid page URL: {url}"))?;
    let params = StoreParams::new(overrides, &ctx, browser).context("capture pass failed")?;

    let report = params.report();
    if report.erased.is_empty() && report.written.is_empty() {
        println!("Nothing to capture ({}).", params.config().storage);
        return Ok(());
    }
    for key in &report.erased {
        println!("erase  {key}");
    }
    for (key, value) in &report.written {
        println!("store  {key}={value}");
    }
    Ok(())
}
