use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::metadata::types::Metadata;

const TITLE_KEYS: [&str; 2] = ["og:title", "twitter:title"];
const DESCRIPTION_KEYS: [&str; 3] = ["og:description", "twitter:description", "description"];
const IMAGE_KEYS: [&str; 4] = ["og:image", "og:image:url", "twitter:image", "twitter:image:src"];

/// `![alt](https://...)`
static MARKDOWN_IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[[^\]]*\]\((https?://[^)\s]+)\)").expect("Failed to compile markdown image regex")
});

/// Bare image link, optional query string
static IMAGE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[^\s)]+?\.(?:png|jpe?g|webp)(?:\?[^\s)]*)?")
        .expect("Failed to compile image url regex")
});

/// Ordered candidates, first value that is non-empty after trimming wins.
pub fn first_non_empty<I, S>(candidates: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}

/// Content of the first `<meta>` whose `property` (or failing that `name`) is `key`.
fn meta_content(document: &Html, key: &str) -> String {
    let key = key.replace('"', "\\\"");
    let lookups = ["property", "name"].map(|attr| {
        Selector::parse(&format!(r#"meta[{attr}="{key}"]"#))
            .ok()
            .and_then(|selector| {
                document
                    .select(&selector)
                    .next()
                    .and_then(|el| el.value().attr("content"))
                    .map(str::to_string)
            })
            .unwrap_or_default()
    });
    first_non_empty(lookups)
}

fn first_meta(document: &Html, keys: &[&str]) -> String {
    first_non_empty(keys.iter().map(|key| meta_content(document, key)))
}

fn title_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

/// Resolve `candidate` against `base` unless it is already absolute.
/// Anything that fails to resolve comes back unchanged.
pub fn resolve_maybe_relative(base: &str, candidate: &str) -> String {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return String::new();
    }
    if Url::parse(candidate).is_ok() {
        return candidate.to_string();
    }
    match Url::parse(base).and_then(|base| base.join(candidate)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => candidate.to_string(),
    }
}

/// Value of the first `Title: ...` line, as rendered by the text proxy.
pub fn parse_title_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("Title:"))
        .map(|title| title.trim().to_string())
        .unwrap_or_default()
}

/// First markdown image, else the first bare png/jpg/jpeg/webp link.
pub fn extract_first_image_url(text: &str) -> String {
    if let Some(caps) = MARKDOWN_IMAGE_REGEX.captures(text) {
        if let Some(m) = caps.get(1) {
            return m.as_str().trim_end_matches(')').to_string();
        }
    }
    IMAGE_URL_REGEX
        .find(text)
        .map(|m| m.as_str().trim_end_matches(')').to_string())
        .unwrap_or_default()
}

/// Best-effort title/description/image from a fetched body.
///
/// OG and twitter-card tags first, then `<title>`. When no image turns up the
/// body is also scanned as plain text/markdown, which only fills in fields
/// that are still empty. `base_url` is used to absolutize relative images.
pub fn parse_page(body: &str, base_url: &str) -> Metadata {
    let document = Html::parse_document(body);

    let title = first_non_empty([first_meta(&document, &TITLE_KEYS), title_text(&document)]);
    let description = first_meta(&document, &DESCRIPTION_KEYS);
    let mut image = first_meta(&document, &IMAGE_KEYS);
    if !image.is_empty() {
        image = resolve_maybe_relative(base_url, &image);
    }

    let mut meta = Metadata {
        title,
        description,
        image,
        ..Default::default()
    };

    if meta.image.is_empty() {
        if meta.title.is_empty() {
            meta.title = parse_title_line(body);
        }
        meta.image = extract_first_image_url(body);
    }

    meta
}
