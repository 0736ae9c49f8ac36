//! Logging configuration and initialization
//!
//! Sets up the tracing subscriber used for structured logging across the
//! handler and the provider client.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Normalize a configured log level into an `EnvFilter` directive
///
/// Only the first word is considered so that values such as
/// `"info # default"` copied from an env file still work. `warning` maps to
/// `warn`, `critical` to `error`, anything unknown to `info`.
pub fn parse_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence; otherwise the configured level applies.
pub fn init_logging(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(parse_level(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_aliases() {
        assert_eq!(parse_level("WARNING"), "warn");
        assert_eq!(parse_level("critical"), "error");
        assert_eq!(parse_level("debug"), "debug");
    }

    #[test]
    fn test_parse_level_takes_first_word() {
        assert_eq!(parse_level("error  # only errors"), "error");
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(parse_level(""), "info");
        assert_eq!(parse_level("verbose"), "info");
    }
}
