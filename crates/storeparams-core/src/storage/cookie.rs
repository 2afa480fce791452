//! Cookie-backed store.
//!
//! Every cookie is scoped to the configured domain and path `/`. Writing an
//! empty value is how a cookie gets deleted: the assignment carries an expiry
//! one day in the past, so `erase` is `store(key, "")`.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use super::{CookieDocument, ParamStore};
use crate::error::StoreResult;

/// `expires` attribute format, e.g. `Thu, 01 Jan 1970 00:00:00 GMT`.
pub(crate) const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Expiries past the last four-digit year are clamped to its final second.
const LAST_EXPIRES_YEAR: i32 = 9999;

fn latest_expiry() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(LAST_EXPIRES_YEAR, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub struct CookieStore<'a> {
    document: &'a mut dyn CookieDocument,
    domain: String,
    /// Lifetime in days; 0 writes session cookies.
    duration_days: u32,
    fixed_now: Option<DateTime<Utc>>,
}

impl<'a> CookieStore<'a> {
    pub fn new(document: &'a mut dyn CookieDocument, domain: String, duration_days: u32) -> Self {
        Self {
            document,
            domain,
            duration_days,
            fixed_now: None,
        }
    }

    /// Pins the clock used for expiry timestamps.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// Builds the `document.cookie` assignment for `name=value`.
    pub fn assignment(&self, name: &str, value: &str) -> String {
        let days = if value.is_empty() {
            -1
        } else {
            i64::from(self.duration_days)
        };

        // Session cookies carry no expiry, except when deleting.
        let expires = if self.duration_days > 0 || value.is_empty() {
            let at = self
                .now()
                .checked_add_signed(Duration::days(days))
                .filter(|at| at.year() <= LAST_EXPIRES_YEAR)
                .unwrap_or_else(latest_expiry);
            format!("; expires={}", at.format(EXPIRES_FORMAT))
        } else {
            String::new()
        };

        format!("{name}={value}{expires};domain={}; path=/", self.domain)
    }
}

impl ParamStore for CookieStore<'_> {
    fn store(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let assignment = self.assignment(key, value);
        tracing::trace!(cookie = %assignment, "set cookie");
        self.document.set_cookie(&assignment)
    }

    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let prefix = format!("{key}=");
        let cookies = self.document.cookie_string();
        Ok(cookies
            .split(';')
            .map(|c| c.trim_start_matches(' '))
            .find_map(|c| c.strip_prefix(prefix.as_str()))
            .map(str::to_string))
    }

    fn erase(&mut self, key: &str) -> StoreResult<()> {
        self.store(key, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    /// Records raw assignments and serves a fixed cookie string.
    #[derive(Default)]
    struct RecordingDocument {
        cookie: String,
        assignments: Vec<String>,
    }

    impl CookieDocument for RecordingDocument {
        fn cookie_string(&self) -> String {
            self.cookie.clone()
        }

        fn set_cookie(&mut self, assignment: &str) -> StoreResult<()> {
            self.assignments.push(assignment.to_string());
            Ok(())
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn assignment_with_duration() {
        let mut doc = RecordingDocument::default();
        let store = CookieStore::new(&mut doc, ".example.com".into(), 14).with_now(noon());
        assert_eq!(
            store.assignment("utm_source", "google.com"),
            "utm_source=google.com; expires=Fri, 15 Mar 2024 12:00:00 GMT;domain=.example.com; path=/"
        );
    }

    #[test]
    fn erase_writes_expired_empty_cookie() {
        let mut doc = RecordingDocument::default();
        {
            let mut store = CookieStore::new(&mut doc, ".example.com".into(), 14).with_now(noon());
            store.erase("utm_medium").unwrap();
        }
        assert_eq!(
            doc.assignments,
            ["utm_medium=; expires=Thu, 29 Feb 2024 12:00:00 GMT;domain=.example.com; path=/"]
        );
    }

    #[test]
    fn zero_duration_writes_session_cookie() {
        let mut doc = RecordingDocument::default();
        let store = CookieStore::new(&mut doc, ".example.com".into(), 0).with_now(noon());
        assert_eq!(
            store.assignment("ref", "xyz"),
            "ref=xyz;domain=.example.com; path=/"
        );
        // Deleting still needs a past expiry.
        assert!(store.assignment("ref", "").contains("expires=Thu, 29 Feb 2024"));
    }

    #[test]
    fn huge_duration_clamps_expiry() {
        let mut doc = RecordingDocument::default();
        let store = CookieStore::new(&mut doc, ".example.com".into(), u32::MAX).with_now(noon());
        assert_eq!(
            store.assignment("ref", "xyz"),
            "ref=xyz; expires=Fri, 31 Dec 9999 23:59:59 GMT;domain=.example.com; path=/"
        );
        let store = CookieStore::new(&mut doc, ".example.com".into(), 100_000_000).with_now(noon());
        assert!(store
            .assignment("ref", "xyz")
            .contains("expires=Fri, 31 Dec 9999 23:59:59 GMT"));
    }

    #[test]
    fn read_scans_cookie_string() {
        let mut doc = RecordingDocument {
            cookie: "_ga=GA1.2; utm_source=google.com;utm_medium=cpc; utm=short".into(),
            ..Default::default()
        };
        let store = CookieStore::new(&mut doc, ".example.com".into(), 14);
        assert_eq!(store.read("utm_source").unwrap().as_deref(), Some("google.com"));
        assert_eq!(store.read("utm_medium").unwrap().as_deref(), Some("cpc"));
        assert_eq!(store.read("utm").unwrap().as_deref(), Some("short"));
        assert_eq!(store.read("utm_term").unwrap(), None);
    }

    #[test]
    fn document_errors_propagate() {
        struct Disabled;
        impl CookieDocument for Disabled {
            fn cookie_string(&self) -> String {
                String::new()
            }
            fn set_cookie(&mut self, _assignment: &str) -> StoreResult<()> {
                Err(StoreError::CookieRejected {
                    name: "utm_source".into(),
                    reason: "cookies disabled".into(),
                })
            }
        }

        let mut doc = Disabled;
        let mut store = CookieStore::new(&mut doc, ".example.com".into(), 14);
        assert!(matches!(
            store.store("utm_source", "x"),
            Err(StoreError::CookieRejected { .. })
        ));
    }
}
