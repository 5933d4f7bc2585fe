//! Core types, configuration, and utilities for the assistant client.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_CHANNEL_URL, DEFAULT_LOG_LEVEL, DEFAULT_MAX_MESSAGE_LENGTH,
    DEFAULT_REQUEST_URL, DEFAULT_RETRY_DELAY_MS,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
