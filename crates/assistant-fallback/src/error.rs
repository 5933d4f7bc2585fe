//! Fallback request error types.

use thiserror::Error;

/// Fallback request error type.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Transport-level HTTP error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote returned a non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Result type alias using RequestError.
pub type RequestResult<T> = Result<T, RequestError>;
