use thiserror::Error;

/// All the ways the browse pipeline can go wrong
///
/// Only `NotFound` and `Validation` are meant for the user. `TransientFetch`
/// is mostly absorbed by the fallback provider before anyone sees it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Fetch failed: {0}")]
    TransientFetch(String),

    #[error("Local storage failed: {0}")]
    Storage(#[from] altdir_cache::StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<altdir_api::ApiError> for Error {
    fn from(err: altdir_api::ApiError) -> Self {
        match err {
            altdir_api::ApiError::NotFound(what) => Error::NotFound(what),
            other => Error::TransientFetch(other.to_string()),
        }
    }
}
