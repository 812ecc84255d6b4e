use crate::errors::ConfigError;
use crate::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the application, used for the config directory
pub const APP_NAME: &str = "kokkai-summary";

/// Secret holding the endpoint URL. Its upper-cased form is the environment variable.
pub const API_URL_SECRET: &str = "kokkai_api_url";

/// Directory where mounted secrets are looked up first
pub const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

/// Configuration file contents. Every field is optional; unset fields fall
/// back to the environment or to built-in defaults at resolve time.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

/// Fully resolved settings the query client is built from
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub endpoint: Url,
    pub retry: RetryPolicy,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_url: other.api_url.clone().or_else(|| self.api_url.clone()),
            max_attempts: other.max_attempts.or(self.max_attempts),
            retry_delay_ms: other.retry_delay_ms.or(self.retry_delay_ms),
            request_timeout_ms: other.request_timeout_ms.or(self.request_timeout_ms),
        }
    }

    /// Resolve against `/run/secrets` and the process environment
    pub fn resolve(&self) -> Result<ClientSettings, ConfigError> {
        self.resolve_with(&SecretSource::default())
    }

    pub fn resolve_with(&self, secrets: &SecretSource) -> Result<ClientSettings, ConfigError> {
        let raw_url = self
            .api_url
            .clone()
            .or_else(|| secrets.read(API_URL_SECRET))
            .ok_or(ConfigError::MissingEndpoint)?;
        let endpoint = parse_endpoint(&raw_url)?;

        let retry = RetryPolicy::new(
            self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            self.retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RETRY_DELAY),
        );

        Ok(ClientSettings {
            endpoint,
            retry,
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

/// Looks a secret up as a file under a secrets directory, then as an
/// upper-cased environment variable.
#[derive(Debug, Clone)]
pub struct SecretSource {
    dir: PathBuf,
    use_env: bool,
}

impl Default for SecretSource {
    fn default() -> Self {
        Self::new(DEFAULT_SECRETS_DIR)
    }
}

impl SecretSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            use_env: true,
        }
    }

    /// Only consult the secrets directory
    pub fn files_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            use_env: false,
        }
    }

    pub fn read(&self, name: &str) -> Option<String> {
        let path = self.dir.join(name);
        if let Ok(content) = fs::read_to_string(&path) {
            let value = content.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }

        if self.use_env {
            std::env::var(name.to_uppercase())
                .ok()
                .filter(|value| !value.trim().is_empty())
        } else {
            None
        }
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> Result<PathBuf, ConfigError> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
