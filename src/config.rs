use std::env;
use thiserror::Error;

/// Base URL used when `DOCUMIND_API_URL` is not provided.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Name of the offending variable.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Runtime configuration for the DocuMind terminal client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the document service exposing `/documents` and `/search`.
    pub api_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Optional log file path; `logs/documind.log` is used when absent.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: default_user_agent(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = match load_env_optional("DOCUMIND_API_URL") {
            Some(value) => validate_url("DOCUMIND_API_URL", value)?,
            None => DEFAULT_API_URL.to_string(),
        };

        Ok(Self {
            api_url,
            user_agent: load_env_optional("DOCUMIND_USER_AGENT")
                .unwrap_or_else(default_user_agent),
            log_file: load_env_optional("DOCUMIND_LOG_FILE"),
        })
    }

    /// Replace the API base URL, typically from a command-line flag.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api_url = validate_url("--api-url", api_url.into())?;
        Ok(self)
    }
}

/// Read `.env` (when present) and build a [`Config`] from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        api_url = %config.api_url,
        user_agent = %config.user_agent,
        log_file = ?config.log_file,
        "Loaded configuration"
    );
    Ok(config)
}

fn default_user_agent() -> String {
    format!("documind/{}", env!("CARGO_PKG_VERSION"))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn validate_url(key: &str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    reqwest::Url::parse(trimmed).map_err(|err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: err.to_string(),
    })?;
    Ok(trimmed.to_string())
}
