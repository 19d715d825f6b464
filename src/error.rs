//! Error types for suno-dl
//!
//! Two tiers of failure exist in a batch run:
//! - Per-item failures (one generation call, one track's download or sidecar
//!   write) are caught by the archiver, logged, and recorded as skips.
//! - Everything else (batch file loading, category folder creation) is fatal
//!   and propagates out of the run.
//!
//! Both tiers use the same [`Error`] type; the tier is decided by where the
//! error is caught, not by its variant.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for suno-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for suno-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "cookie")
        key: Option<String>,
    },

    /// Batch specification file is missing, unreadable, or malformed
    #[error("invalid batch file: {0}")]
    InvalidBatch(String),

    /// The generation service rejected or failed a request
    #[error("generation failed: {0}")]
    Generation(String),

    /// The generation service returned a non-success HTTP status
    #[error("service error: HTTP {status}: {message}")]
    Service {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// A track could not be fetched or relocated
    #[error("download failed for track {id}: {reason}")]
    Download {
        /// The service-assigned track identifier
        id: String,
        /// The reason the download failed
        reason: String,
    },

    /// No collision-free filename could be found
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path for which no free name was found
        path: PathBuf,
        /// The reason the scan gave up
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a configuration error with an associated key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
