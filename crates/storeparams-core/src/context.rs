//! Page URL, query parameters and referrer for one capture pass.
//!
//! The host environment hands these in explicitly; nothing here reads global
//! browser state.

use url::Url;

/// Strips a single leading `www.` label from a hostname.
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Read-only view of the page being captured.
#[derive(Debug, Clone)]
pub struct PageContext {
    url: Url,
    referrer: Option<Url>,
}

impl PageContext {
    /// Parses the page URL and referrer.
    ///
    /// The page URL must be valid. A missing, empty or unparseable referrer is
    /// treated as no referrer.
    pub fn new(page_url: &str, referrer: Option<&str>) -> Result<Self, url::ParseError> {
        let url = Url::parse(page_url)?;
        let referrer = referrer
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .and_then(|r| match Url::parse(r) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::debug!(referrer = r, "ignoring malformed referrer: {}", e);
                    None
                }
            });
        Ok(Self { url, referrer })
    }

    pub fn from_parts(url: Url, referrer: Option<Url>) -> Self {
        Self { url, referrer }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Hostname of the page, empty for URLs without a host.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn referrer(&self) -> Option<&Url> {
        self.referrer.as_ref()
    }

    /// The referrer, only when its hostname differs from the page's.
    pub fn external_referrer(&self) -> Option<&Url> {
        self.referrer
            .as_ref()
            .filter(|r| r.host_str().unwrap_or("") != self.host())
    }

    pub fn query_has(&self, name: &str) -> bool {
        self.url.query_pairs().any(|(k, _)| k == name)
    }

    /// First value of `name` in the query string, percent-decoded.
    pub fn query_get(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_www_prefix() {
        assert_eq!(strip_www("www.google.com"), "google.com");
        assert_eq!(strip_www("google.com"), "google.com");
        assert_eq!(strip_www("www2.google.com"), "www2.google.com");
        assert_eq!(strip_www("news.www.example"), "news.www.example");
    }

    #[test]
    fn query_lookup_takes_first_value() {
        let ctx = PageContext::new("https://shop.example/?a=1&b=two%20words&a=2&c=x+y", None).unwrap();
        assert!(ctx.query_has("a"));
        assert_eq!(ctx.query_get("a").as_deref(), Some("1"));
        assert_eq!(ctx.query_get("b").as_deref(), Some("two words"));
        assert_eq!(ctx.query_get("c").as_deref(), Some("x y"));
        assert!(!ctx.query_has("d"));
        assert_eq!(ctx.query_get("d"), None);
    }

    #[test]
    fn empty_query_value_is_present() {
        let ctx = PageContext::new("https://shop.example/?utm_term=", None).unwrap();
        assert!(ctx.query_has("utm_term"));
        assert_eq!(ctx.query_get("utm_term").as_deref(), Some(""));
    }

    #[test]
    fn malformed_or_empty_referrer_is_absent() {
        let ctx = PageContext::new("https://shop.example/", Some("not a url")).unwrap();
        assert!(ctx.referrer().is_none());
        let ctx = PageContext::new("https://shop.example/", Some("")).unwrap();
        assert!(ctx.referrer().is_none());
    }

    #[test]
    fn invalid_page_url_is_an_error() {
        assert!(PageContext::new("/relative/path", None).is_err());
    }

    #[test]
    fn external_referrer_compares_hostnames() {
        let ctx = PageContext::new("https://shop.example/", Some("https://www.google.com/search")).unwrap();
        assert_eq!(
            ctx.external_referrer().map(Url::as_str),
            Some("https://www.google.com/search")
        );

        let ctx = PageContext::new("https://shop.example/a", Some("http://shop.example:8080/b")).unwrap();
        assert!(ctx.referrer().is_some());
        assert!(ctx.external_referrer().is_none());

        let ctx = PageContext::new("https://shop.example/", Some("https://www.shop.example/")).unwrap();
        assert!(ctx.external_referrer().is_some());
    }
}
