//! Top-level application configuration.
//!
//! Configuration is stored in `.aerodesk/config.yaml` and includes:
//! - The GraphQL endpoint of the airline API
//! - An optional bearer token for that endpoint
//! - The timeout applied to every remote call

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AerodeskError, Result};

/// Directory holding aerodesk's per-project state
pub const CONFIG_DIR: &str = ".aerodesk";

/// Endpoint used when neither the config file nor the environment names one
pub const DEFAULT_API_URL: &str = "http://localhost:4000/graphql";

const API_URL_ENV: &str = "AERODESK_API_URL";
const API_TOKEN_ENV: &str = "AERODESK_API_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// API endpoint configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Prefer a non-empty environment value over the configured one
fn env_or(env_value: Option<String>, configured: Option<&String>) -> Option<String> {
    match env_value {
        Some(value) if !value.is_empty() => Some(value),
        _ => configured.cloned(),
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_DIR).join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            AerodeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        // Ensure .aerodesk directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AerodeskError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            AerodeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Owner read/write only, the file may hold a token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api.url {
            parse_api_url(url)?;
        }
        if self.request_timeout == 0 {
            return Err(AerodeskError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the API endpoint from environment variable or config
    pub fn api_url(&self) -> Result<Url> {
        let raw = env_or(env::var(API_URL_ENV).ok(), self.api.url.as_ref())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        parse_api_url(&raw)
    }

    /// Get the API token from environment variable or config
    pub fn api_token(&self) -> Option<String> {
        env_or(env::var(API_TOKEN_ENV).ok(), self.api.token.as_ref())
    }

    /// Set the API endpoint, validating it first
    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        parse_api_url(url)?;
        self.api.url = Some(url.to_string());
        Ok(())
    }

    /// Set the API token
    pub fn set_api_token(&mut self, token: String) {
        self.api.token = Some(token);
    }

    /// Get the remote operation timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Set the remote operation timeout in seconds
    pub fn set_request_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(AerodeskError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }
        self.request_timeout = seconds;
        Ok(())
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| AerodeskError::Config(format!("invalid api.url '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AerodeskError::Config(format!(
            "invalid api.url '{raw}': unsupported scheme '{other}'"
        ))),
    }
}
