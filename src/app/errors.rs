use crate::{links::LinkError, metadata::FetchError};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("url is required")]
    MissingUrl,

    #[error("{0}")]
    InvalidUrl(String),

    #[error("failed to fetch metadata: {0}")]
    Fetch(#[from] FetchError),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}

impl From<LinkError> for AppError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::InvalidUrl(msg) => AppError::InvalidUrl(msg),
        }
    }
}
