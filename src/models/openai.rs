//! OpenAI API data models
//!
//! Request payload for chat completions and helpers for reading OpenAI
//! error bodies. Success bodies are relayed as untyped JSON.

use serde::{Deserialize, Serialize};

use crate::core::constants::{prompt, response_format, role};

/// OpenAI message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

/// Requested response format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

/// OpenAI chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIChatCompletionRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    pub response_format: OpenAIResponseFormat,
}

impl OpenAIChatCompletionRequest {
    /// Build the guidance request: fixed system prompt, then the query verbatim
    pub fn guidance(model: &str, query: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                OpenAIMessage {
                    role: role::SYSTEM.to_string(),
                    content: prompt::SYSTEM.to_string(),
                },
                OpenAIMessage {
                    role: role::USER.to_string(),
                    content: query.to_string(),
                },
            ],
            response_format: OpenAIResponseFormat {
                format_type: response_format::JSON_OBJECT.to_string(),
            },
        }
    }
}

/// Message embedded in an OpenAI error body (`{"error": {"message": ...}}`)
///
/// Empty or non-string messages count as absent.
pub fn error_message(body: &serde_json::Value) -> Option<&str> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_guidance_payload_shape() {
        let request = OpenAIChatCompletionRequest::guidance("gpt-3.5-turbo", "Tengo miedo");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
        assert_eq!(value["messages"][0]["role"], "system");
        assert!(
            value["messages"][0]["content"]
                .as_str()
                .unwrap()
                .contains("'verses' array")
        );
        assert_eq!(value["messages"][1], json!({"role": "user", "content": "Tengo miedo"}));
    }

    #[test]
    fn test_query_is_not_sanitized() {
        let query = "\"quotes\" <tags> \n newline";
        let request = OpenAIChatCompletionRequest::guidance("m", query);
        assert_eq!(request.messages[1].content, query);
    }

    #[test]
    fn test_error_message_extraction() {
        let body = json!({"error": {"message": "rate limited", "type": "requests"}});
        assert_eq!(error_message(&body), Some("rate limited"));

        assert_eq!(error_message(&json!({"detail": "nope"})), None);
        assert_eq!(error_message(&json!({"error": "flat string"})), None);
        assert_eq!(error_message(&json!({"error": {"message": ""}})), None);
        assert_eq!(error_message(&json!([1, 2, 3])), None);
    }
}
