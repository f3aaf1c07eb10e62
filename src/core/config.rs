//! Application configuration management
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables. Everything is validated before the request
//! is sent so a misconfigured run fails without touching the network.

use crate::core::constants::{defaults, env};
use anyhow::{Context, Result, bail};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RequestConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Resolved runner configuration
///
/// The API key is held as a [`SecretString`] so it never shows up in
/// `Debug` output or log records.
#[derive(Debug)]
pub struct Config {
    /// Credential sent as a bearer token
    pub api_key: SecretString,

    /// Service base URL, without trailing slash
    pub base_url: String,

    /// Optional request timeout in seconds
    pub request_timeout: Option<u64>,

    /// Model identifier
    pub model: String,

    /// System instruction
    pub instructions: String,

    /// User input
    pub input: String,

    /// Logging level
    pub log_level: String,
}

impl Config {
    /// Load configuration from a TOML file, overridden by the process environment
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - No API key is available
    /// - An override has an invalid value
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = Self::read_file(path.as_ref())?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Load configuration from the environment and an optional config file
    ///
    /// Uses `CONFIG_PATH` if set, otherwise `config.toml` in the current
    /// directory when it exists, otherwise environment and defaults only.
    pub fn from_env() -> Result<Self> {
        match Self::config_path(|key| std::env::var(key).ok()) {
            Some(path) => Self::from_file(path),
            None => Self::resolve(TomlConfig::default(), |key| std::env::var(key).ok()),
        }
    }

    fn config_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        if let Some(explicit) = lookup(env::CONFIG_PATH) {
            return Some(PathBuf::from(explicit));
        }
        let default = PathBuf::from(defaults::CONFIG_FILE);
        default.exists().then_some(default)
    }

    fn read_file(path: &Path) -> Result<TomlConfig> {
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read configuration file {}", path.display())
        })?;
        toml::from_str(&content).context("Failed to parse TOML configuration")
    }

    /// Merge file values with environment overrides and defaults
    fn resolve(file: TomlConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(api_key) = lookup(env::API_KEY).or(file.openai.api_key) else {
            bail!(
                "No API key configured. Set {} or openai.api_key in the config file",
                env::API_KEY
            );
        };

        let request_timeout = match lookup(env::REQUEST_TIMEOUT) {
            Some(raw) => Some(raw.trim().parse::<u64>().with_context(|| {
                format!("{} must be a whole number of seconds, got {:?}", env::REQUEST_TIMEOUT, raw)
            })?),
            None => file.openai.request_timeout,
        }
        // 0 means "no timeout", not "time out immediately"
        .filter(|secs| *secs > 0);

        let base_url = lookup(env::BASE_URL)
            .or(file.openai.base_url)
            .unwrap_or_else(|| defaults::BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            api_key: SecretString::from(api_key),
            base_url,
            request_timeout,
            model: lookup(env::MODEL)
                .or(file.request.model)
                .unwrap_or_else(|| defaults::MODEL.to_string()),
            instructions: lookup(env::INSTRUCTIONS)
                .or(file.request.instructions)
                .unwrap_or_else(|| defaults::INSTRUCTIONS.to_string()),
            input: lookup(env::INPUT)
                .or(file.request.input)
                .unwrap_or_else(|| defaults::INPUT.to_string()),
            log_level: lookup(env::LOG_LEVEL)
                .or(file.log_level)
                .unwrap_or_else(|| defaults::LOG_LEVEL.to_string()),
        })
    }
}
