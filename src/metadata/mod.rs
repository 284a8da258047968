pub mod challenge;
pub mod fetch;
pub mod headers;
pub mod merge;
pub mod parse;
pub mod sanitize;
pub mod types;

pub use types::{FetchError, Metadata, Source};

use std::time::Duration;
use tokio::time::Instant;

use crate::config::MetadataConfig;
use challenge::is_challenge;
use sanitize::sanitize;

/// Two-stage metadata extraction: direct fetch, then the rendering proxy when
/// the direct result looks blocked, failed or empty.
///
/// Stateless apart from the pooled client, so one instance can be shared by
/// concurrent callers. Dropping the future returned by [`extract`] cancels
/// whichever request is in flight.
///
/// [`extract`]: MetadataExtractor::extract
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    client: reqwest::Client,
    proxy_base: String,
    accept_language: String,
    max_body_bytes: usize,
    overall_timeout: Duration,
}

impl MetadataExtractor {
    pub fn new(config: &MetadataConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            proxy_base: config.proxy_base.clone(),
            accept_language: config.accept_language.clone(),
            max_body_bytes: config.max_body_bytes,
            overall_timeout: config.overall_timeout(),
        })
    }

    /// Proxy base with the target appended verbatim.
    pub fn proxy_url(&self, target_url: &str) -> String {
        format!("{}{}", self.proxy_base, target_url)
    }

    async fn fetch_and_parse(
        &self,
        url: &str,
        base_url: &str,
        deadline: Instant,
    ) -> Result<(Metadata, u16), FetchError> {
        let request = fetch::fetch(
            &self.client,
            url,
            headers::browser_headers(&self.accept_language),
            self.max_body_bytes,
        );

        let page = match tokio::time::timeout_at(deadline, request).await {
            Ok(page) => page?,
            Err(_) => return Err(FetchError::Timeout(self.overall_timeout)),
        };

        Ok((parse::parse_page(&page.text(), base_url), page.status))
    }

    /// Never fails because a page was hard to scrape. The only error is the
    /// direct fetch failing at transport level *and* the proxy failing too;
    /// the direct error is returned in that case.
    pub async fn extract(&self, target_url: &str) -> Result<Metadata, FetchError> {
        let deadline = Instant::now() + self.overall_timeout;

        let (mut primary, primary_err, status) =
            match self.fetch_and_parse(target_url, target_url, deadline).await {
                Ok((meta, status)) => (meta, None, Some(status)),
                Err(err) => {
                    log::warn!("{target_url}: direct fetch failed: {err}");
                    (Metadata::default(), Some(err), None)
                }
            };

        if let Some(status) = status.filter(|s| *s != 200) {
            log::info!("{target_url}: direct fetch returned status {status}");
        }

        let direct_challenge = is_challenge(&primary.title);
        let needs_fallback =
            primary_err.is_some() || status != Some(200) || direct_challenge || primary.is_empty();

        if !needs_fallback {
            primary.source = Some(Source::Direct);
            sanitize(&mut primary, false);
            log::debug!("{target_url}: source=direct fields=[{}]", primary.describe_fields());
            return Ok(primary);
        }

        log::info!(
            "{target_url}: trying proxy (status={status:?} challenge={direct_challenge} empty={})",
            primary.is_empty()
        );

        let proxy_url = self.proxy_url(target_url);
        let fallback = match self.fetch_and_parse(&proxy_url, target_url, deadline).await {
            Ok((fallback, fallback_status)) => {
                if fallback_status != 200 {
                    log::info!("{target_url}: proxy returned status {fallback_status}");
                }
                fallback
            }
            Err(err) => {
                log::warn!("failed to fetch metadata via proxy: {err} (target={target_url})");
                if let Some(primary_err) = primary_err {
                    return Err(primary_err);
                }
                primary.source = Some(Source::Direct);
                sanitize(&mut primary, direct_challenge);
                return Ok(primary);
            }
        };

        let fallback_challenge = is_challenge(&fallback.title);
        let mut merged = merge::merge(&primary, &fallback);
        merged.source = Some(Source::Proxy);
        sanitize(&mut merged, direct_challenge || fallback_challenge);

        log::debug!(
            "{target_url}: source=proxy blocked={} fields=[{}]",
            merged.blocked,
            merged.describe_fields()
        );

        Ok(merged)
    }
}
