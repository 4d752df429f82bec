//! `config show`, `config set` and `config get`.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{AerodeskError, Result};

/// Keys accepted by `config set` and `config get`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigKey {
    ApiUrl,
    ApiToken,
    RequestTimeout,
}

impl ConfigKey {
    const ALL: [ConfigKey; 3] = [Self::ApiUrl, Self::ApiToken, Self::RequestTimeout];

    fn name(self) -> &'static str {
        match self {
            ConfigKey::ApiUrl => "api.url",
            ConfigKey::ApiToken => "api.token",
            ConfigKey::RequestTimeout => "request_timeout",
        }
    }

    /// Resolve a key name; `api_url` style spellings get a dot-notation hint
    fn parse(raw: &str) -> Result<Self> {
        if let Some(key) = Self::ALL.into_iter().find(|k| k.name() == raw) {
            return Ok(key);
        }
        if let Some(key) = Self::ALL.into_iter().find(|k| k.name().replace('.', "_") == raw) {
            return Err(AerodeskError::Config(format!(
                "invalid config key '{raw}'. Use dot notation: '{}'",
                key.name()
            )));
        }
        let valid: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
        Err(AerodeskError::Config(format!(
            "unknown config key '{raw}'. Valid keys: {}",
            valid.join(", ")
        )))
    }
}

/// Keep the first and last two characters of a secret
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}...{tail}")
}

pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let endpoint = config.api_url()?;
    let has_token = config.api_token().is_some();
    let path = Config::config_path();

    let json_output = json!({
        "api": {
            "url": endpoint.as_str(),
            "token_configured": has_token,
        },
        "request_timeout": config.request_timeout,
        "config_file": path.to_string_lossy(),
    });

    let token = if has_token {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    };
    let mut text = String::new();
    let _ = writeln!(text, "{}\n", "Configuration:".cyan().bold());
    let _ = writeln!(text, "{}:", "api".cyan());
    let _ = writeln!(text, "  url: {endpoint}");
    let _ = writeln!(text, "  token: {token}\n");
    let _ = writeln!(text, "{}: {}s\n", "request_timeout".cyan(), config.request_timeout);
    let _ = write!(text, "{}", format!("Config file: {}", path.display()).dimmed());

    CommandOutput::new(json_output).with_text(text).print(output)
}

pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let key = ConfigKey::parse(key)?;
    let mut config = Config::load()?;

    let (shown, text) = match key {
        ConfigKey::ApiUrl => {
            config.set_api_url(value)?;
            (json!(value), format!("Set {} to {value}", key.name().cyan()))
        }
        ConfigKey::ApiToken => {
            config.set_api_token(value.to_string());
            (json!(null), format!("Set {}", key.name().cyan()))
        }
        ConfigKey::RequestTimeout => {
            let seconds = value.trim().parse::<u64>().map_err(|_| {
                AerodeskError::Config(format!(
                    "invalid value '{value}' for request_timeout. Expected a number of seconds"
                ))
            })?;
            config.set_request_timeout(seconds)?;
            (json!(seconds), format!("Set {} to {seconds}s", key.name().cyan()))
        }
    };
    config.save()?;

    let mut json_output = json!({
        "action": "config_set",
        "key": key.name(),
        "success": true,
    });
    if !shown.is_null() {
        json_output["value"] = shown;
    }
    CommandOutput::new(json_output).with_text(text).print(output)
}

pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let key = ConfigKey::parse(key)?;
    let config = Config::load()?;

    let (json_output, text) = match key {
        ConfigKey::ApiUrl => {
            let url = config.api_url()?;
            (json!({ "key": key.name(), "value": url.as_str() }), url.to_string())
        }
        ConfigKey::ApiToken => match config.api_token() {
            Some(token) => {
                let masked = mask_secret(&token);
                (
                    json!({
                        "key": key.name(),
                        "value": masked,
                        "configured": true,
                        "masked": true,
                    }),
                    format!("{masked} (masked)"),
                )
            }
            None => (
                json!({ "key": key.name(), "value": null, "configured": false }),
                "not configured".to_string(),
            ),
        },
        ConfigKey::RequestTimeout => (
            json!({ "key": key.name(), "value": config.request_timeout }),
            config.request_timeout.to_string(),
        ),
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdefgh"), "ab...gh");
        assert_eq!(mask_secret("abcd"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_config_key_parse() {
        assert_eq!(ConfigKey::parse("api.url").unwrap(), ConfigKey::ApiUrl);
        assert_eq!(
            ConfigKey::parse("request_timeout").unwrap(),
            ConfigKey::RequestTimeout
        );

        let err = ConfigKey::parse("api_token").unwrap_err();
        assert!(err.to_string().contains("'api.token'"));

        let err = ConfigKey::parse("database.url").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
        assert!(err.to_string().contains("api.url, api.token, request_timeout"));
    }
}
