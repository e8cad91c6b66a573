//! Errors raised while loading a listing page

use thiserror::Error;

/// A failed attempt to load the next listing page.
///
/// Every variant is reported to the user the same way; the variants only
/// exist so logs can say what actually went wrong.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid page url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed pagination attribute {attribute}={value:?}")]
    MalformedCursor { attribute: String, value: String },
}

impl LoadError {
    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
