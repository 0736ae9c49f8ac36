//! Provider abstraction for the chat-completion backend
//!
//! The handler only depends on the [`Provider`] trait, so the OpenAI client
//! can be swapped for a fake in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::constants::message;

/// Failure of a single outbound completion call
///
/// Every variant is terminal; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Provider answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Provider answered 2xx but the body was not JSON
    #[error("{}", message::PARSE_FAILURE)]
    Parse,

    /// Connection, DNS, TLS, timeout or body read failure
    #[error("Request error: {0}")]
    Request(String),
}

impl ProviderError {
    /// Status code to relay to the caller, if the provider supplied one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::Parse | ProviderError::Request(_) => None,
        }
    }
}

/// Trait for chat-completion providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Ask for verse guidance on `query` and return the provider's JSON body
    async fn create_guidance(&self, query: &str) -> Result<serde_json::Value, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_status_and_message() {
        let err = ProviderError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_parse_and_request_errors_have_no_status() {
        assert_eq!(ProviderError::Parse.status_code(), None);
        assert_eq!(
            ProviderError::Parse.to_string(),
            "Failed to parse OpenAI response"
        );

        let err = ProviderError::Request("connection refused".to_string());
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "Request error: connection refused");
    }
}
