//! One-shot HTTP fallback for the assistant client.
//!
//! Used when the persistent channel is unavailable or not desired. Each
//! call is a single request/response exchange; no retry, no queueing —
//! the caller decides whether and when to invoke it.

mod client;
mod error;

pub use client::{FallbackClient, DEFAULT_TIMEOUT_SECS};
pub use error::{RequestError, RequestResult};
