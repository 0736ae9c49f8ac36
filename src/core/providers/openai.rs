//! OpenAI provider implementation
//!
//! One POST per call, no retries. The whole body is read before the status
//! and payload are classified.

use crate::core::constants::message;
use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::{OpenAIChatCompletionRequest, error_message};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// OpenAI chat-completions provider
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key, sent as a bearer token
    /// * `base_url` - API base URL without the `/chat/completions` suffix
    /// * `model` - Chat model to request
    /// * `timeout` - Optional request timeout in seconds
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Option<u64>,
    ) -> Result<Self> {
        // 3xx must reach classify_response instead of being followed
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(secs) = timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Map a fully read provider response onto the call result
    fn classify_response(status: StatusCode, body: &[u8]) -> Result<Value, ProviderError> {
        if status.is_success() {
            return serde_json::from_slice(body).map_err(|_| ProviderError::Parse);
        }

        let message = match serde_json::from_slice::<Value>(body) {
            // A literal `null` body carries no error object to read from
            Ok(Value::Null) | Err(_) => {
                format!("{}: {}", message::PROVIDER_ERROR, status.as_u16())
            }
            Ok(value) => error_message(&value)
                .unwrap_or(message::PROVIDER_ERROR)
                .to_string(),
        };

        Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Transport failure with its full source chain, e.g. `error sending request: connection refused`
fn request_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Request(format!("{:#}", anyhow::Error::from(err)))
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn create_guidance(&self, query: &str) -> Result<Value, ProviderError> {
        let request = OpenAIChatCompletionRequest::guidance(&self.model, query);
        let payload =
            serde_json::to_vec(&request).map_err(|e| ProviderError::Request(e.to_string()))?;

        debug!(
            "Sending guidance request: model={}, payload_bytes={}",
            self.model,
            payload.len()
        );

        let started = Instant::now();
        let response = self
            .client
            .post(self.completions_url())
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, payload.len())
            .bearer_auth(&self.api_key)
            .body(payload)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(request_error)?;

        let result = Self::classify_response(status, &body);
        match &result {
            Ok(_) => info!(
                "OpenAI responded {} in {}ms",
                status.as_u16(),
                started.elapsed().as_millis()
            ),
            Err(e) => warn!("OpenAI call failed with status {}: {}", status.as_u16(), e),
        }

        result
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
