//! Error types for quick-doc.
//!
//! Most pipeline stages degrade to a safe default instead of failing, so the
//! variants here mark the few boundaries where a caller has to react.

use std::time::Duration;

/// Error type for extraction, export and download operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A link selector could not be parsed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// The page context failed to answer, or answered with `success: false`.
    #[error("{0}")]
    Communication(String),

    /// The page context did not answer in time.
    #[error("Page did not respond within {0:?}")]
    Timeout(Duration),

    /// A single download request failed.
    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    /// Stored settings could not be used.
    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An extension pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Result type alias for quick-doc operations.
pub type Result<T> = std::result::Result<T, Error>;
