//! Widget Configuration
//!
//! Configuration for the chat widget, optionally loaded from a TOML file at
//! `~/.config/reisebot/widget.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. CLI arguments (applied by the caller after loading)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:5000"
//! request_timeout_secs = 120
//!
//! [ui]
//! thank_you_secs = 3
//! log_file = "/tmp/reisebot.log"
//! ```
//!
//! # Environment Variables
//!
//! - `REISEBOT_BASE_URL`
//! - `REISEBOT_REQUEST_TIMEOUT` (seconds)
//! - `REISEBOT_THANK_YOU_SECS`
//! - `REISEBOT_LOG_FILE`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default chat server
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// `[server]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerToml {
    /// Base URL of the chat server
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

/// `[ui]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToml {
    /// How long the feedback thank-you notice stays visible
    pub thank_you_secs: Option<u64>,
    /// Where to write logs
    pub log_file: Option<PathBuf>,
}

/// Top-level TOML structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetToml {
    /// Server section
    pub server: ServerToml,
    /// UI section
    pub ui: UiToml,
}

/// Resolved widget configuration
#[derive(Clone, Debug)]
pub struct WidgetConfig {
    /// Base URL the endpoint paths are appended to
    pub base_url: String,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// Lifetime of the feedback thank-you notice
    pub thank_you_duration: Duration,
    /// Log file (logging goes nowhere when unset)
    pub log_file: Option<PathBuf>,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            thank_you_duration: Duration::from_secs(3),
            log_file: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl WidgetConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Full URL for an endpoint path such as `/api/chat`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Check values that would make the widget unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Command-line overrides, highest priority
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub base_url: Option<String>,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set log file override
    #[must_use]
    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut WidgetConfig) {
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
            config.set_source(ConfigSource::Cli);
        }
        if let Some(ref path) = self.log_file {
            config.log_file = Some(path.clone());
            config.set_source(ConfigSource::Cli);
        }
    }
}

/// Default configuration file path (`$XDG_CONFIG_HOME/reisebot/widget.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("reisebot").join("widget.toml"))
}

/// Load configuration from the default path and the environment
///
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<WidgetConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the environment
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<WidgetConfig, ConfigError> {
    load_config_with_overrides(path, &ConfigOverrides::default())
}

/// Load configuration from a path and the environment, then apply CLI overrides
///
/// Validation runs once, on the fully resolved configuration.
pub fn load_config_with_overrides(
    path: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<WidgetConfig, ConfigError> {
    resolve_config(path, |key| std::env::var(key).ok(), overrides)
}

#[cfg(test)]
fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<WidgetConfig, ConfigError> {
    resolve_config(path, env, &ConfigOverrides::default())
}

fn resolve_config(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
    overrides: &ConfigOverrides,
) -> Result<WidgetConfig, ConfigError> {
    let mut config = WidgetConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: WidgetToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    overrides.apply(&mut config);
    config.validate()?;

    Ok(config)
}

fn apply_toml_config(config: &mut WidgetConfig, toml: &WidgetToml) {
    if let Some(ref url) = toml.server.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = toml.server.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.ui.thank_you_secs {
        config.thank_you_duration = Duration::from_secs(secs);
    }
    if toml.ui.log_file.is_some() {
        config.log_file = toml.ui.log_file.clone();
    }
}

fn apply_env_config(config: &mut WidgetConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(url) = env("REISEBOT_BASE_URL") {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("REISEBOT_REQUEST_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.request_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(thank_you) = env("REISEBOT_THANK_YOU_SECS") {
        if let Ok(secs) = thank_you.parse::<u64>() {
            config.thank_you_duration = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(path) = env("REISEBOT_LOG_FILE") {
        config.log_file = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
}
