//! Error types for the catalog probe library.

use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a probe session or a single transport call.
///
/// Assertion failures inside a case are not errors; they are reported
/// through [`crate::testing::Failure`].
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL could not be parsed
    #[error("Invalid URL `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    /// Transport-level failure (connect, timeout, body read)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Collection endpoint answered with a non-success status
    #[error("Failed to fetch items from {url}: status {status}")]
    Fetch { url: String, status: u16 },

    /// Collection endpoint returned no items
    #[error("No items found at {url}")]
    EmptyCollection { url: String },

    /// Response body did not have the expected shape
    #[error("Unexpected response body: {0}")]
    InvalidBody(String),

    /// JSON decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the session has nothing to test.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::EmptyCollection { .. })
    }
}
