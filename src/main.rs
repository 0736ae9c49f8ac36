//! Bible guidance API
//!
//! A single HTTP endpoint that forwards a free-text query to the OpenAI chat
//! completions API and relays back a JSON object of relevant Bible verses.

mod api;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::provider::Provider;
use crate::core::providers::OpenAIProvider;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    // Print startup banner
    print_startup_banner(&config);

    // Without a key the server still answers, but every guidance request gets a 500
    let provider: Option<Arc<dyn Provider>> = match &config.openai_api_key {
        Some(api_key) => match OpenAIProvider::new(
            api_key.clone(),
            config.openai_base_url.clone(),
            config.model.clone(),
            config.request_timeout,
        ) {
            Ok(provider) => Some(Arc::new(provider) as Arc<dyn Provider>),
            Err(e) => {
                error!("Failed to create provider: {:#}", e);
                std::process::exit(1);
            }
        },
        None => {
            warn!("OPENAI_API_KEY is not set; guidance requests will fail with 500");
            None
        }
    };

    if let Some(provider) = &provider {
        info!("Using provider: {}", provider.provider_name());
    }

    // Create router
    let app = create_router(AppState::new(config.clone(), provider));

    // Bind to address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("📖 Bible Guidance API v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!("   Base URL: {}", config.openai_base_url);
    println!("   Model: {}", config.model);
    println!(
        "   API Key: {}",
        if config.has_api_key() {
            "Configured"
        } else {
            "Missing"
        }
    );
    match config.request_timeout {
        Some(secs) => println!("   Request Timeout: {}s", secs),
        None => println!("   Request Timeout: transport default"),
    }
    println!(
        "   Env var listing on missing key: {}",
        if config.expose_env_vars {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("Bible Guidance API v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: bible-guidance [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration file:");
    println!("  CONFIG_PATH - TOML config file (default: config.toml, optional)");
    println!();
    println!("Environment variables (override the config file):");
    println!("  OPENAI_API_KEY - Your OpenAI API key (required for guidance requests)");
    println!("  OPENAI_BASE_URL - API base URL (default: https://api.openai.com/v1)");
    println!("  OPENAI_MODEL - Chat model (default: gpt-3.5-turbo)");
    println!("  HOST - Server host (default: 0.0.0.0)");
    println!("  PORT - Server port (default: 3000)");
    println!("  LOG_LEVEL - Logging level (default: info)");
    println!("  REQUEST_TIMEOUT - Outbound timeout in seconds (default: none)");
    println!("  EXPOSE_ENV_VARS - List env var names when the key is missing (default: true)");
    println!();
    println!("Endpoints:");
    println!("  POST any path  {{\"query\": \"...\"}} -> {{\"verses\": [...]}}");
    println!("  OPTIONS        CORS preflight");
    println!("  GET /health    Health check");
}
