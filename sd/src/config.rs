//! Slotdesk configuration types and loading

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::schedule::{AvailabilityStore, ScheduleError};

/// Default config file name, looked up in the working directory first
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Gemini API key not found. Set gemini.app-key in the config file or the {env} environment variable.")]
    MissingApiKey { env: String },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// LLM provider name (only "gemini" is supported)
    pub provider: String,

    /// Gemini provider configuration
    pub gemini: GeminiConfig,

    /// Conversation behaviour
    pub assistant: AssistantConfig,

    /// Availability table override, `day -> ["HH:MM" | "occupied"]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BTreeMap<String, Vec<String>>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            provider: "gemini".to_string(),
            gemini: GeminiConfig::default(),
            assistant: AssistantConfig::default(),
            schedule: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must exist. Otherwise the first default location that
    /// exists is used; if none does, built-in defaults apply. A file that
    /// exists but does not parse is always an error.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        debug!(?config_path, "Config::load: called");
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                debug!(?candidate, "Config::load: found default config");
                return Self::load_from_file(&candidate);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed here; `load` reports them properly afterwards.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|config| config.log_level)
    }

    /// Check everything the chat session needs before it starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Config::validate: called");
        self.gemini.api_key()?;
        self.availability()?;

        if self.assistant.max_steps == 0 {
            return Err(ConfigError::InvalidValue("assistant.max-steps must be at least 1".to_string()));
        }
        if self.assistant.greeting.trim().is_empty() {
            return Err(ConfigError::InvalidValue("assistant.greeting must not be empty".to_string()));
        }
        if self.assistant.exit_keyword.trim().is_empty() {
            return Err(ConfigError::InvalidValue("assistant.exit-keyword must not be empty".to_string()));
        }
        Ok(())
    }

    /// Build the availability table: the `[schedule]` section or the built-in week
    pub fn availability(&self) -> Result<AvailabilityStore, ConfigError> {
        match &self.schedule {
            Some(table) => {
                debug!(day_count = table.len(), "Config::availability: using configured schedule");
                Ok(AvailabilityStore::from_strings(table)?)
            }
            None => {
                debug!("Config::availability: using built-in schedule");
                Ok(AvailabilityStore::builtin())
            }
        }
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE), PathBuf::from(".slotdesk.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("slotdesk").join(CONFIG_FILE));
        }
        paths
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content, ConfigFormat::from_path(path)).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// On-disk config format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; takes precedence over the environment variable
    #[serde(rename = "app-key", skip_serializing)]
    pub app_key: Option<String>,

    /// Environment variable containing the API key
    #[serde(rename = "app-key-env")]
    pub app_key_env: String,

    /// Model identifier
    pub model: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            app_key: None,
            app_key_env: "GEMINI_API_KEY".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
        }
    }
}

impl GeminiConfig {
    /// Resolve the API key: `app-key` first, then the `app-key-env` variable
    pub fn api_key(&self) -> Result<SecretString, ConfigError> {
        if let Some(key) = self.app_key.as_deref().map(str::trim).filter(|key| !key.is_empty()) {
            debug!("GeminiConfig::api_key: using key from config file");
            return Ok(SecretString::from(key.to_string()));
        }

        match std::env::var(&self.app_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                debug!(env = %self.app_key_env, "GeminiConfig::api_key: using key from environment");
                Ok(SecretString::from(key.trim().to_string()))
            }
            _ => Err(ConfigError::MissingApiKey {
                env: self.app_key_env.clone(),
            }),
        }
    }
}

/// Conversation behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// First message sent on the customer's behalf
    pub greeting: String,

    /// Input that ends the conversation (compared exactly)
    #[serde(rename = "exit-keyword")]
    pub exit_keyword: String,

    /// Maximum model round-trips per turn
    #[serde(rename = "max-steps")]
    pub max_steps: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello, I would like to schedule an appointment.".to_string(),
            exit_keyword: "exit".to_string(),
            max_steps: 8,
        }
    }
}
