use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors that can stop a fetch from producing a response at all.
///
/// An HTTP error status is not a failure; it travels back as data inside
/// [`FetchedPage`](super::fetch::FetchedPage).
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// DNS, connect, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Which fetch stage produced the content accepted into the final record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Direct,
    Proxy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    /// Absolute http(s) URL, or empty
    pub image: String,
    /// Unset until the orchestrator accepts a stage
    pub source: Option<Source>,
    /// The target resisted automated access; title and description are empty
    pub blocked: bool,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.image.is_empty()
    }

    /// Short field summary for logs
    pub fn describe_fields(&self) -> String {
        let mut fields = Vec::new();
        if !self.title.is_empty() {
            fields.push("title");
        }
        if !self.description.is_empty() {
            fields.push("description");
        }
        if !self.image.is_empty() {
            fields.push("image");
        }
        fields.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Direct).unwrap(), "\"direct\"");
        assert_eq!(serde_json::to_string(&Source::Proxy).unwrap(), "\"proxy\"");
    }

    #[test]
    fn test_describe_fields() {
        let m = Metadata {
            title: "T".into(),
            image: "https://example.com/a.png".into(),
            ..Default::default()
        };
        assert_eq!(m.describe_fields(), "title,image");
        assert!(!m.is_empty());
        assert!(Metadata::default().is_empty());
    }
}
