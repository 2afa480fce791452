//! `storeparams read <key>` – read a value through the configured backend.

use anyhow::Result;
use storeparams_core::config::{ConfigOverrides, StoreParamsConfig};
use storeparams_core::profile::BrowserProfile;
use storeparams_core::storage::select_backend;

/// Reads `key` without running a capture pass. Prints the value, or `(not set)`.
pub fn run_read(browser: &mut BrowserProfile, overrides: ConfigOverrides, key: &str) -> Result<()> {
    match read_value(browser, overrides, key)? {
        Some(value) => println!("{value}"),
        None => println!("(not set)"),
    }
    Ok(())
}

fn read_value(
    browser: &mut BrowserProfile,
    overrides: ConfigOverrides,
    key: &str,
) -> Result<Option<String>> {
    // Reads don't depend on the cookie domain, so no page host is needed.
    let config = StoreParamsConfig::resolve(overrides, "");
    let store = select_backend(&config, browser);
    Ok(store.read(key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storeparams_core::storage::{CookieDocument, WebStorage};
    use storeparams_core::StorageKind;

    #[test]
    fn reads_from_selected_backend() {
        let mut browser = BrowserProfile::default();
        browser.cookies.set_cookie("utm_source=cookie").unwrap();
        browser.session.set_item("utm_source", "session").unwrap();

        let cookie = read_value(&mut browser, ConfigOverrides::default(), "utm_source").unwrap();
        assert_eq!(cookie.as_deref(), Some("cookie"));

        let overrides = ConfigOverrides {
            storage: Some(StorageKind::SessionStorage),
            ..Default::default()
        };
        let session = read_value(&mut browser, overrides, "utm_source").unwrap();
        assert_eq!(session.as_deref(), Some("session"));

        let overrides = ConfigOverrides {
            storage: Some(StorageKind::LocalStorage),
            ..Default::default()
        };
        assert_eq!(read_value(&mut browser, overrides, "utm_source").unwrap(), None);
    }
}
