use serde::{Deserialize, Serialize};

use crate::metadata::{Metadata, MetadataExtractor};

#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Link as submitted by a client (browser extension, web UI).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LinkCreate {
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// Page the link was saved from
    #[serde(default, rename = "page")]
    pub page_url: String,
    #[serde(default)]
    pub note: String,
    pub tags: Option<Vec<String>>,
}

/// Link enriched with extracted metadata, ready to hand to storage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PreparedLink {
    pub url: String,
    pub title: String,
    pub description: String,
    pub domain: String,
    pub og_image: String,
    pub page_url: String,
    pub note: String,
    pub tags: Vec<String>,
}

/// Host without a leading `www.`.
pub fn link_domain(url: &str) -> Result<String, LinkError> {
    let parsed = url::Url::parse(url).map_err(|e| LinkError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.strip_prefix("www.").unwrap_or(host).to_string()),
        _ => Err(LinkError::InvalidUrl(format!("{url}: missing host"))),
    }
}

/// Fold extraction output into the submitted link.
///
/// A submitted title that is empty or just the URL gives way to the
/// extracted one. Without metadata the link is kept as submitted.
pub fn apply_metadata(req: LinkCreate, domain: String, meta: Option<&Metadata>) -> PreparedLink {
    let mut title = req.title;
    let mut description = String::new();
    let mut og_image = String::new();

    if let Some(meta) = meta {
        description = meta.description.clone();
        og_image = meta.image.clone();
        if (title.is_empty() || title == req.url) && !meta.title.is_empty() {
            title = meta.title.clone();
        }
    }

    PreparedLink {
        url: req.url,
        title,
        description,
        domain,
        og_image,
        page_url: req.page_url,
        note: req.note,
        tags: req.tags.unwrap_or_default(),
    }
}

/// Validate, extract, merge. Extraction failure never fails the save.
pub async fn prepare_link(
    extractor: &MetadataExtractor,
    req: LinkCreate,
) -> Result<PreparedLink, LinkError> {
    let domain = link_domain(&req.url)?;

    let meta = match extractor.extract(&req.url).await {
        Ok(meta) => Some(meta),
        Err(err) => {
            log::warn!("failed to fetch metadata for {}: {err}", req.url);
            None
        }
    };

    Ok(apply_metadata(req, domain, meta.as_ref()))
}
