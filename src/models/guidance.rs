//! Guidance request and answer models
//!
//! The inbound body is read loosely: anything that is not a JSON object with
//! a non-empty string `query` is rejected by the handler. The answer types
//! describe what the prompt asks the model for; they are never used to gate
//! or reshape what the caller receives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extract a usable `query` from a raw request body
///
/// An empty or non-JSON body behaves like `{}`. `null`, numbers, objects and
/// the empty string are all rejected.
pub fn extract_query(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    value
        .get("query")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// A single suggested verse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    /// Spanish reference, e.g. `Juan 3:16`
    pub reference: String,
    /// Verse text in Spanish
    pub text: String,
    /// Why the verse is relevant, in English
    pub reason: String,
}

/// The JSON object the model is asked to produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseGuidance {
    pub verses: Vec<Verse>,
}

impl VerseGuidance {
    /// Best-effort read of the guidance from a provider body
    ///
    /// Accepts either a bare `{verses: [...]}` object or a chat completion
    /// whose first choice carries it as JSON-encoded message content.
    pub fn from_provider_body(body: &Value) -> Option<Self> {
        if let Ok(guidance) = serde_json::from_value::<Self>(body.clone()) {
            return Some(guidance);
        }

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)?;
        serde_json::from_str(content).ok()
    }
}
