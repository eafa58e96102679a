//! Error types for the knowledge client.

use thiserror::Error;

/// Result type for knowledge client operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Knowledge provider errors.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The provider did not answer within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl KnowledgeError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            KnowledgeError::Network(_) | KnowledgeError::Timeout(_) => true,
            KnowledgeError::Api { status, .. } => *status == 429 || *status >= 500,
            KnowledgeError::Config(_) | KnowledgeError::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_transient() {
        let err = KnowledgeError::Api {
            status: 429,
            message: "slow down".into(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_bad_request_is_not_transient() {
        let err = KnowledgeError::Api {
            status: 400,
            message: "bad model".into(),
        };
        assert!(!err.is_transient());
        assert!(!KnowledgeError::Parse("x".into()).is_transient());
    }
}
