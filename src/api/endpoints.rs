//! API endpoint handlers
//!
//! This module implements the guidance endpoint, the CORS middleware that
//! wraps every response, and a health check.

use crate::api::error::{ApiError, visible_env_var_names};
use crate::core::config::Config;
use crate::core::constants::cors;
use crate::core::provider::{Provider, ProviderError};
use crate::models::guidance::{VerseGuidance, extract_query};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Request, State, rejection::BytesRejection},
    http::{
        HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Source of environment variable names for the missing-credential diagnostic
pub type EnvKeys = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no credential is configured
    pub provider: Option<Arc<dyn Provider>>,
    pub env_keys: EnvKeys,
}

impl AppState {
    pub fn new(config: Arc<Config>, provider: Option<Arc<dyn Provider>>) -> Self {
        Self {
            config,
            provider,
            env_keys: Arc::new(process_env_keys),
        }
    }

    /// Replace the environment snapshot used by the missing-credential error
    pub fn with_env_keys(mut self, keys: Vec<String>) -> Self {
        self.env_keys = Arc::new(move || keys.clone());
        self
    }
}

fn process_env_keys() -> Vec<String> {
    std::env::vars_os()
        .filter_map(|(key, _)| key.into_string().ok())
        .collect()
}

/// Create the API router
///
/// Every request except `GET /health` is served by the guidance handler.
/// Query length is unbounded, so the default body limit is lifted.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(bible_guidance))
        .fallback(bible_guidance)
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(apply_cors))
        .with_state(state)
}

/// Attach the CORS headers to every response, errors included
async fn apply_cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static(cors::ALLOW_CREDENTIALS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(cors::ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(cors::ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(cors::ALLOW_HEADERS),
    );

    response
}

/// Guidance endpoint - any method, any path
async fn bible_guidance(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    // An unreadable body is judged like an empty one, after the earlier checks
    let body = body.unwrap_or_default();
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("guidance", %request_id, %method);

    async move {
        match guide(&state, &method, &body).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    ApiError::Provider(provider_err) => error!("Error: {}", provider_err),
                    ApiError::MissingCredential { .. } => error!("{}", err),
                    _ => debug!("Rejected request: {}", err),
                }
                err.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn guide(state: &AppState, method: &Method, body: &[u8]) -> Result<Response, ApiError> {
    // Preflight skips every other check
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let Some(provider) = state.provider.as_ref() else {
        let env_vars = state
            .config
            .expose_env_vars
            .then(|| visible_env_var_names((state.env_keys)()));
        return Err(ApiError::MissingCredential { env_vars });
    };

    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let query = extract_query(body).ok_or(ApiError::InvalidQuery)?;
    info!("📥 Guidance request: query_chars={}", query.chars().count());

    // Detached so a caller disconnect does not abort the outbound call
    let provider = Arc::clone(provider);
    let outbound =
        tokio::spawn(async move { provider.create_guidance(&query).await }.in_current_span());
    let answer = outbound
        .await
        .map_err(|e| ProviderError::Request(e.to_string()))??;

    match VerseGuidance::from_provider_body(&answer) {
        Some(guidance) => debug!("Provider suggested {} verses", guidance.verses.len()),
        None => warn!("Provider answer does not carry a verses object; relaying as-is"),
    }

    Ok((StatusCode::OK, Json(answer)).into_response())
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.provider.as_ref().map(|p| p.provider_name()),
        "api_key_configured": state.config.has_api_key(),
        "model": state.config.model,
    }))
}
