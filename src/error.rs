//! Error types for lokalise-dl
//!
//! Every failure aborts the whole download. Errors bubble up unchanged through
//! the pipeline and are wrapped exactly once at the top level in
//! [`Error::DownloadFailed`], so callers get a short summary with the original
//! cause chained behind it.

use thiserror::Error;

/// Result type alias for lokalise-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lokalise-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api_token")
        key: Option<String>,
    },

    /// The Lokalise API (or the bundle host) answered with an HTTP error status
    #[error("Lokalise API returned HTTP {status}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Raw response body, as far as it could be read
        body: String,
    },

    /// A response was decoded but lacks a field the pipeline depends on
    #[error("{field} not found")]
    MissingField {
        /// Name of the absent JSON field (e.g. "bundle_url")
        field: &'static str,
    },

    /// Archive entry whose name does not follow the `<code>.properties` layout
    #[error("unsupported bundle entry {name:?}: expected <language>.properties")]
    UnsupportedEntry {
        /// Full entry name as stored in the archive
        name: String,
    },

    /// The downloaded bundle could not be decoded as a ZIP stream
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),

    /// Top-level wrapper carrying the failure that aborted a download run
    #[error("Lokalise download failed")]
    DownloadFailed {
        /// The error that aborted the run
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration
    Configuration,
    /// The platform rejected a request or answered with an unreadable body
    Upstream,
    /// The platform response lacked an expected field
    MissingField,
    /// Connection, timeout or stream failure
    Transport,
    /// Output directory or file could not be written
    Filesystem,
    /// The bundle archive does not have the expected shape
    Format,
}

impl Error {
    /// Create a configuration error for the given key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Wrap an error as the top-level download failure.
    ///
    /// Already wrapped errors are returned unchanged so the chain never nests
    /// the summary twice.
    pub fn download_failed(source: Error) -> Self {
        match source {
            Error::DownloadFailed { .. } => source,
            other => Error::DownloadFailed {
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, with the top-level wrapper removed
    pub fn root(&self) -> &Error {
        match self {
            Error::DownloadFailed { source } => source.root(),
            other => other,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } => ErrorKind::Configuration,
            Error::Api { .. } | Error::Serialization(_) => ErrorKind::Upstream,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::UnsupportedEntry { .. } | Error::Archive(_) => ErrorKind::Format,
            Error::Network(_) | Error::Other(_) => ErrorKind::Transport,
            Error::Io(_) => ErrorKind::Filesystem,
            Error::DownloadFailed { source } => source.kind(),
        }
    }
}
