//! Error types for the HTTP transport

use thiserror::Error;

/// Errors that can occur while talking to a remote host
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection could not be opened, or the call timed out
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// Reading or forwarding the response body failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Response body is larger than the caller is willing to buffer
    #[error("Response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}
