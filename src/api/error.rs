//! Handler error type
//!
//! Every failure reaching the caller is an [`ApiError`], rendered as
//! `{"error": ...}` JSON by its `IntoResponse` impl.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::core::constants::message;
use crate::core::provider::ProviderError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No provider credential configured
    #[error("{}", message::MISSING_CREDENTIAL)]
    MissingCredential { env_vars: Option<String> },

    #[error("{}", message::METHOD_NOT_ALLOWED)]
    MethodNotAllowed,

    #[error("{}", message::INVALID_QUERY)]
    InvalidQuery,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidQuery => StatusCode::BAD_REQUEST,
            Self::Provider(err) => err
                .status_code()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "envVars", skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        let env_vars = match self {
            Self::MissingCredential { env_vars } => env_vars,
            _ => None,
        };

        (status, Json(ErrorBody { error, env_vars })).into_response()
    }
}

/// Comma-joined environment variable names, hiding anything that looks secret
///
/// Names containing `TOKEN` or `SECRET` (case-sensitive) are dropped. Order
/// is preserved.
pub fn visible_env_var_names<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .filter(|key| {
            let key = key.as_ref();
            !key.contains("TOKEN") && !key.contains("SECRET")
        })
        .map(|key| key.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingCredential { env_vars: None }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::InvalidQuery.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_status_is_relayed() {
        let err = ApiError::from(ProviderError::Api {
            status: 429,
            message: "rate limited".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_provider_without_status_defaults_to_500() {
        assert_eq!(
            ApiError::from(ProviderError::Parse).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ProviderError::Request("refused".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_provider_status_defaults_to_500() {
        let err = ApiError::from(ProviderError::Api {
            status: 1000,
            message: "weird".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_visible_env_var_names_hides_secrets() {
        let keys = [
            "PATH",
            "GITHUB_TOKEN",
            "HOME",
            "AWS_SECRET_ACCESS_KEY",
            "secret_lowercase",
        ];
        assert_eq!(visible_env_var_names(keys), "PATH, HOME, secret_lowercase");
    }

    #[test]
    fn test_visible_env_var_names_empty() {
        assert_eq!(visible_env_var_names(Vec::<String>::new()), "");
    }
}
