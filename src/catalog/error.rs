//! Error types for catalog loading.

use thiserror::Error;

/// Errors that can occur while fetching or decoding the lecture catalog.
///
/// `Clone` is required so a single failed fetch can resolve every waiter
/// holding the shared single-flight handle.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Endpoint answered with a non-success status
    #[error("Catalog request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// Payload was not a valid lecture array
    #[error("Failed to decode catalog payload: {message}")]
    Decode { message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    Url { message: String },
}

impl CatalogError {
    /// Returns true if this error is potentially transient.
    ///
    /// The loader never retries on its own; this exists for callers that
    /// rebuild the loader after a session-fatal failure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::Network { .. } | CatalogError::Status { .. }
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::Url {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode {
            message: err.to_string(),
        }
    }
}
