//! Application configuration management
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables. The resulting [`Config`] is passed explicitly
//! to the handler state and the provider; nothing downstream reads the
//! process environment for settings.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default OpenAI API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default server port
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RequestConfig {
    /// Outbound timeout in seconds; unset leaves the transport defaults
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DebugConfig {
    #[serde(default = "default_expose_env_vars")]
    pub expose_env_vars: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            expose_env_vars: default_expose_env_vars(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_expose_env_vars() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider credential; `None` when not configured
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL
    pub openai_base_url: String,

    /// Chat model sent with every completion request
    pub model: String,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Outbound request timeout in seconds
    pub request_timeout: Option<u64>,

    /// Whether the missing-credential error lists environment variable names
    pub expose_env_vars: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

impl Config {
    fn from_toml(config: TomlConfig) -> Self {
        Config {
            openai_api_key: non_empty(config.openai.api_key),
            openai_base_url: config
                .openai
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config
                .openai
                .model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            request_timeout: config.request.request_timeout,
            expose_env_vars: config.debug.expose_env_vars,
        }
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;

        let config: TomlConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        Ok(Self::from_toml(config))
    }

    /// Load configuration from the optional config file and the environment
    ///
    /// Looks for `config.toml` in the current directory unless `CONFIG_PATH`
    /// points elsewhere. A missing default file is not an error; a missing
    /// explicit `CONFIG_PATH` is.
    pub fn from_env() -> Result<Self> {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path))?,
            Err(_) if Path::new("config.toml").exists() => Self::from_file("config.toml")?,
            Err(_) => Self::default(),
        };

        let vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        base.with_overrides(&vars)
    }

    /// Apply environment-style overrides on top of this configuration
    ///
    /// # Errors
    ///
    /// Returns error if a numeric or boolean override cannot be parsed.
    pub fn with_overrides(mut self, vars: &HashMap<String, String>) -> Result<Self> {
        if let Some(key) = vars.get("OPENAI_API_KEY") {
            self.openai_api_key = non_empty(Some(key.clone()));
        }
        if let Some(url) = vars.get("OPENAI_BASE_URL") {
            self.openai_base_url = url.clone();
        }
        if let Some(model) = vars.get("OPENAI_MODEL") {
            self.model = model.clone();
        }
        if let Some(host) = vars.get("HOST") {
            self.host = host.clone();
        }
        if let Some(port) = vars.get("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(level) = vars.get("LOG_LEVEL") {
            self.log_level = level.clone();
        }
        if let Some(timeout) = vars.get("REQUEST_TIMEOUT") {
            self.request_timeout = Some(
                timeout
                    .parse()
                    .with_context(|| format!("Invalid REQUEST_TIMEOUT value: {}", timeout))?,
            );
        }
        if let Some(flag) = vars.get("EXPOSE_ENV_VARS") {
            self.expose_env_vars = parse_flag(flag)
                .with_context(|| format!("Invalid EXPOSE_ENV_VARS value: {}", flag))?;
        }

        // Trailing slash would double up when joining the completions path
        self.openai_base_url = self.openai_base_url.trim_end_matches('/').to_string();

        Ok(self)
    }

    /// Whether a provider credential is configured
    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [openai]
            api_key = "sk-test123"
            base_url = "http://localhost:9999/v1/"
            model = "gpt-4o-mini"

            [server]
            host = "127.0.0.1"
            port = 8082
            log_level = "debug"

            [request]
            request_timeout = 30

            [debug]
            expose_env_vars = false
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test123"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.port, 8082);
        assert_eq!(config.request_timeout, Some(30));
        assert!(!config.expose_env_vars);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, None);
        assert!(config.expose_env_vars);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[server\nport = ").unwrap();
        file.flush().unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = create_test_config();
        let config = Config::from_file(file.path())
            .unwrap()
            .with_overrides(&vars(&[
                ("OPENAI_API_KEY", "sk-from-env"),
                ("PORT", "9000"),
                ("EXPOSE_ENV_VARS", "yes"),
            ]))
            .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.port, 9000);
        assert!(config.expose_env_vars);
        assert_eq!(config.openai_base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let config = Config::default()
            .with_overrides(&vars(&[("OPENAI_API_KEY", "  ")]))
            .unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_invalid_numeric_override() {
        let result = Config::default().with_overrides(&vars(&[("PORT", "eighty")]));
        assert!(result.is_err());

        let result = Config::default().with_overrides(&vars(&[("EXPOSE_ENV_VARS", "maybe")]));
        assert!(result.is_err());
    }
}
