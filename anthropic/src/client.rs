//! Anthropic API client implementation

use crate::{
    error::ClaudeError,
    messages::{MessagesRequest, MessagesResponse},
};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Create a new client with API key from environment
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::MissingApiKey` if `ANTHROPIC_API_KEY` is not set
    /// or blank.
    pub fn from_env() -> Result<Self, ClaudeError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ClaudeError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Point the client at a different base URL (proxies, tests)
    #[must_use]
    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound every request by `timeout`
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::ClientBuild` if the HTTP client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ClaudeError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClaudeError::ClientBuild(e.to_string()))?;
        Ok(self)
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Create messages (non-streaming)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse, ClaudeError> {
        tracing::debug!(model = %request.model, max_tokens = request.max_tokens, "Sending messages request");

        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.json::<MessagesResponse>().await?;
                tracing::debug!(
                    id = %body.id,
                    input_tokens = body.usage.input_tokens,
                    output_tokens = body.usage.output_tokens,
                    "Messages request completed"
                );
                Ok(body)
            },
            StatusCode::TOO_MANY_REQUESTS => Err(ClaudeError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(ClaudeError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "Messages request rejected");
                Err(ClaudeError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AnthropicClient::new("test-key");
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = AnthropicClient::new("k").with_base_url("http://127.0.0.1:9999/v1/");
        assert_eq!(client.api_url(), "http://127.0.0.1:9999/v1");
    }

    #[test]
    fn debug_output_hides_key() {
        let client = AnthropicClient::new("secret-key");
        assert!(!format!("{client:?}").contains("secret-key"));
    }
}
