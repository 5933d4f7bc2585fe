//! Channel error types.

use thiserror::Error;

/// Channel error type.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to transmit on an open channel
    #[error("Failed to send message: {0}")]
    Send(String),

    /// Malformed JSON frame
    #[error("Invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),

    /// Not connected error
    #[error("Not connected to channel")]
    NotConnected,

    /// Outbound message exceeds the configured limit
    #[error("Message too long: {length} characters, max {max}")]
    MessageTooLong { length: usize, max: usize },
}

/// Result type alias using ChannelError.
pub type ChannelResult<T> = Result<T, ChannelError>;
