//! Orthanc client error types.

use thiserror::Error;

/// Errors that can occur when talking to an Orthanc server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the credentials.
    #[error("unauthorized: check the Orthanc username and password")]
    Unauthorized,

    /// The server returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to decode a response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configured server URL cannot be used.
    #[error("invalid Orthanc URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}
