use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, USER_AGENT,
};

// Some sites behind bot protection block obvious crawler UAs from cloud IPs.
pub const USER_AGENT_BROWSER: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";
pub const ACCEPT_DEFAULT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE_DEFAULT: &str = "ja,en-US;q=0.9,en;q=0.8";

/// Browser-like header set applied to every outbound metadata request.
///
/// An `accept_language` that is not a valid header value falls back to
/// [`ACCEPT_LANGUAGE_DEFAULT`].
pub fn browser_headers(accept_language: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_BROWSER));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_DEFAULT));

    let language = HeaderValue::from_str(accept_language).unwrap_or_else(|_| {
        log::warn!("invalid accept-language {accept_language:?}, using default");
        HeaderValue::from_static(ACCEPT_LANGUAGE_DEFAULT)
    });
    headers.insert(ACCEPT_LANGUAGE, language);

    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}
