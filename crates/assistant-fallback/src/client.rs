//! HTTP client for the fallback request path.

use crate::{RequestError, RequestResult};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Request payload for the process endpoint.
#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    text: &'a str,
}

/// One-shot request/response client.
///
/// Stateless alternative to the persistent channel: each call posts the
/// message to `{request_url}/process` and returns the JSON response
/// verbatim.
#[derive(Clone, Debug)]
pub struct FallbackClient {
    http_client: reqwest::Client,
    request_url: String,
}

impl FallbackClient {
    /// Create a new fallback client for the given base URL.
    pub fn new(request_url: impl Into<String>) -> Self {
        Self::with_timeout(request_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new fallback client with a custom request timeout.
    pub fn with_timeout(request_url: impl Into<String>, timeout_secs: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            request_url: request_url.into(),
        }
    }

    /// Send a message over the fallback path.
    ///
    /// Returns the JSON response body on any 2xx status; any other status
    /// or transport failure is an error. The caller decides whether to
    /// retry.
    pub async fn request(&self, message: &str) -> RequestResult<serde_json::Value> {
        let url = format!("{}/process", self.request_url);
        debug!(url = %url, "Sending fallback request");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&ProcessRequest { text: message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Fallback request failed");
            return Err(RequestError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        Ok(payload)
    }
}

impl From<&assistant_core::Config> for FallbackClient {
    fn from(config: &assistant_core::Config) -> Self {
        Self::new(config.request_url.clone())
    }
}
