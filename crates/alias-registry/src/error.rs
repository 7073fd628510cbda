//! Registry error types.

use std::path::PathBuf;

/// Errors that can occur while syncing a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The listing API could not be reached or the request failed in transit.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The listing API answered with a non-success status.
    #[error("request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The listing body was not a list of directory items.
    #[error("invalid listing from {url}: {detail}")]
    InvalidListing { url: String, detail: String },

    /// The registry file could not be written.
    #[error("cannot write registry at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
