//! Constants for chat roles, the guidance prompt and CORS headers
//!
//! This module defines string constants shared by the outbound payload
//! builder and the request handler.

/// Message role constants
pub mod role {
    /// System role identifier
    pub const SYSTEM: &str = "system";

    /// User role identifier
    pub const USER: &str = "user";
}

/// Response format constants
pub mod response_format {
    /// Forces the model to answer with a single JSON object
    pub const JSON_OBJECT: &str = "json_object";
}

/// Prompt constants
pub mod prompt {
    /// Fixed system prompt sent ahead of every user query
    pub const SYSTEM: &str = "You are a biblical guidance assistant for a Reina-Valera Spanish Bible app. \
When the user asks a question or describes a problem, provide 3-5 Bible verses that address their situation. \
Format your response as a JSON object with a 'verses' array containing objects with 'reference' \
(e.g., 'Juan 3:16'), 'text' (the verse text in Spanish), and 'reason' (brief explanation in English \
of why this verse is relevant). Use Spanish verse references.";
}

/// CORS header values applied to every response
pub mod cors {
    pub const ALLOW_CREDENTIALS: &str = "true";
    pub const ALLOW_ORIGIN: &str = "*";
    pub const ALLOW_METHODS: &str = "POST, OPTIONS";
    pub const ALLOW_HEADERS: &str = "Content-Type";
}

/// Error messages returned to callers
pub mod message {
    /// Credential is not configured
    pub const MISSING_CREDENTIAL: &str = "OpenAI API key is missing from environment variables";

    /// Method other than POST or OPTIONS
    pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

    /// Body without a usable `query`
    pub const INVALID_QUERY: &str = "Missing or invalid query parameter";

    /// Provider answered 2xx with a body that is not JSON
    pub const PARSE_FAILURE: &str = "Failed to parse OpenAI response";

    /// Provider error body was JSON but carried no message
    pub const PROVIDER_ERROR: &str = "OpenAI API error";
}
