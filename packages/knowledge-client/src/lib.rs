//! REST client for search-grounded chat completion providers
//!
//! Speaks the OpenAI-compatible `/chat/completions` dialect used by
//! Perplexity (`sonar`, `sonar-pro`) and returns the assistant text along
//! with any citations the provider attached. No domain-specific logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use knowledge_client::{ChatRequest, KnowledgeClient, Message};
//!
//! let client = KnowledgeClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("sonar-pro")
//!         .message(Message::system("Answer with a JSON array only."))
//!         .message(Message::user("List distributors of part 6ES7 214-1AG40-0XB0 in Europe")),
//! ).await?;
//! println!("{}", response.content);
//! ```

pub mod error;
pub mod types;

pub use error::{KnowledgeError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default provider endpoint.
pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Knowledge provider API client.
#[derive(Clone)]
pub struct KnowledgeClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl KnowledgeClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: PERPLEXITY_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create from environment variable `KNOWLEDGE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("KNOWLEDGE_API_KEY")
            .map_err(|_| KnowledgeError::Config("KNOWLEDGE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (OpenAI-compatible proxies, other providers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Chat completion.
    ///
    /// Sends the conversation and returns the first choice's content.
    /// A response with no choices or an empty message is an API error.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(timeout_secs = self.timeout.as_secs(), "Knowledge request timed out");
                    KnowledgeError::Timeout(self.timeout.as_secs())
                } else {
                    warn!(error = %e, "Knowledge request failed");
                    KnowledgeError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Knowledge API error");
            return Err(KnowledgeError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| KnowledgeError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| KnowledgeError::Api {
                status: status.as_u16(),
                message: "No content in provider response".into(),
            })?;

        debug!(
            model = %request.model,
            citations = raw.citations.len(),
            duration_ms = start.elapsed().as_millis(),
            "Knowledge chat completion"
        );

        Ok(ChatResponse {
            content,
            citations: raw.citations,
            usage: raw.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = KnowledgeClient::new("pplx-test")
            .with_base_url("https://proxy.internal/v1/")
            .with_timeout(Duration::from_secs(12));

        assert_eq!(client.api_key, "pplx-test");
        assert_eq!(client.base_url(), "https://proxy.internal/v1");
        assert_eq!(client.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_defaults_point_at_perplexity() {
        let client = KnowledgeClient::new("pplx-test");
        assert_eq!(client.base_url(), PERPLEXITY_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }
}
