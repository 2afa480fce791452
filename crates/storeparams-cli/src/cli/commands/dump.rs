//! `storeparams dump` – show the profile's cookies and storage areas.

use storeparams_core::profile::BrowserProfile;

pub fn run_dump(browser: &BrowserProfile) {
    println!("{:<16} {:<24} {:<32} {}", "AREA", "KEY", "EXPIRES", "VALUE");
    for (name, cookie) in browser.cookies.iter() {
        let expires = cookie
            .expires
            .map(|e| e.to_rfc3339())
            .unwrap_or_else(|| "session".to_string());
        println!("{:<16} {:<24} {:<32} {}", "cookies", name, expires, cookie.value);
    }
    for (key, value) in browser.local.iter() {
        println!("{:<16} {:<24} {:<32} {}", "localStorage", key, "-", value);
    }
    for (key, value) in browser.session.iter() {
        println!("{:<16} {:<24} {:<32} {}", "sessionStorage", key, "-", value);
    }
}
