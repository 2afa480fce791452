//! `storeparams new-session` – end the current browser session.

use storeparams_core::profile::BrowserProfile;

pub fn run_new_session(browser: &mut BrowserProfile) {
    browser.end_session();
    println!("Session ended; session storage and session cookies cleared.");
}
