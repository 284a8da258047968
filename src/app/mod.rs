pub mod errors;

pub use errors::AppError;

use crate::{
    config::Config,
    links::{self, LinkCreate, PreparedLink},
    metadata::{Metadata, MetadataExtractor},
};

/// Process-wide handle shared by the CLI and the HTTP daemon.
pub struct App {
    config: Config,
    extractor: MetadataExtractor,
}

impl App {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let extractor = MetadataExtractor::new(&config.metadata)?;
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The engine does not re-validate its input, so the host check lives here.
    pub async fn fetch_metadata(&self, url: &str) -> Result<Metadata, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::MissingUrl);
        }
        links::link_domain(url)?;

        Ok(self.extractor.extract(url).await?)
    }

    pub async fn create_link(&self, link_create: LinkCreate) -> Result<PreparedLink, AppError> {
        Ok(links::prepare_link(&self.extractor, link_create).await?)
    }
}
