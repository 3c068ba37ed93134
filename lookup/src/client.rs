//! Lookup Service client implementation.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use eagle_core::{EnvelopeError, UpstreamEnvelope};

/// Error type for lookup operations.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP request failed (transport error or timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with an error code.
    #[error("lookup API error: {code}")]
    Api {
        /// The reported error code.
        code: String,
    },

    /// The response body did not match the documented envelope.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
}

/// Options for constructing a [`LookupClient`].
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Maximum number of results requested per query.
    pub limit: u32,

    /// Result language code.
    pub lang: String,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            limit: 300,
            lang: "en".into(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    token: &'a str,
    request: &'a str,
    limit: u32,
    lang: &'a str,
}

/// Lookup Service API client.
#[derive(Debug, Clone)]
pub struct LookupClient {
    client: Client,
    base_url: String,
    token: String,
    limit: u32,
    lang: String,
}

impl LookupClient {
    /// Create a new lookup client with default options.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_options(base_url, token, LookupOptions::default())
    }

    /// Create a new lookup client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        token: impl Into<String>,
        options: LookupOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            limit: options.limit,
            lang: options.lang,
        }
    }

    /// Run one query against the Lookup Service.
    ///
    /// Only the first line of the query text is transmitted; the rest of a
    /// multi-line input is dropped before it leaves the process.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Http`] on transport failure or timeout.
    /// - [`LookupError::Api`] if the upstream reports an error code.
    /// - [`LookupError::Envelope`] if the body does not match the envelope.
    pub async fn search(&self, query: &str) -> Result<UpstreamEnvelope, LookupError> {
        let request_line = query.lines().next().unwrap_or_default();

        let request = LookupRequest {
            token: &self.token,
            request: request_line,
            limit: self.limit,
            lang: &self.lang,
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;
        match UpstreamEnvelope::from_value(&body)? {
            UpstreamEnvelope::Error(code) => {
                tracing::warn!(code = %code, "lookup API reported an error");
                Err(LookupError::Api { code })
            }
            envelope => Ok(envelope),
        }
    }
}
