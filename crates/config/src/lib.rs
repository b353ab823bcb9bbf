//! Configuration loading, validation, and management for Tutorly.
//!
//! Loads configuration from `~/.tutorly/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.tutorly/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP timeout for a single completion call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub tutor: TutorConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_provider() -> String {
    "groq".into()
}
fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_request_timeout() -> u64 {
    120
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("providers", &self.providers)
            .field("gateway", &self.gateway)
            .field("tutor", &self.tutor)
            .field("catalog", &self.catalog)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API, e.g. `https://api.groq.com/openai/v1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Maximum accepted request body size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    7860
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// How many past exchanges are folded into a chat prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Questions per generated quiz
    #[serde(default = "default_quiz_questions")]
    pub quiz_questions: u8,
}

fn default_history_window() -> usize {
    3
}
fn default_quiz_questions() -> u8 {
    5
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            quiz_questions: default_quiz_questions(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Replace the built-in catalog with this TOML file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.tutorly/config.toml).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Load configuration from `path` (or the default path) and apply
    /// environment overrides:
    /// - `TUTORLY_API_KEY`, then `GROQ_API_KEY`, then `OPENAI_API_KEY`
    ///   (only when the file sets no key)
    /// - `TUTORLY_PROVIDER`
    /// - `TUTORLY_MODEL`
    pub fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(path.unwrap_or(&default_path))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            self.api_key = non_empty("TUTORLY_API_KEY")
                .or_else(|| non_empty("GROQ_API_KEY"))
                .or_else(|| non_empty("OPENAI_API_KEY"));
        }
        if let Some(provider) = non_empty("TUTORLY_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = non_empty("TUTORLY_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tutorly")
    }

    /// Check value ranges. Run after any command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.tutor.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "tutor.history_window must be at least 1".into(),
            ));
        }
        if !(1..=20).contains(&self.tutor.quiz_questions) {
            return Err(ConfigError::ValidationError(
                "tutor.quiz_questions must be between 1 and 20".into(),
            ));
        }
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError("gateway.port must be non-zero".into()));
        }
        Ok(())
    }

    /// The API key for the active provider, per-provider key first.
    pub fn resolved_api_key(&self) -> Option<&str> {
        self.api_key_for(&self.provider)
    }

    /// The API key for `provider`: its own non-blank key, else the global one.
    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        let non_blank = |k: &&str| !k.trim().is_empty();
        self.providers
            .get(provider)
            .and_then(|p| p.api_key.as_deref())
            .filter(non_blank)
            .or_else(|| self.api_key.as_deref().filter(non_blank))
    }

    /// Fail unless a credential is available for the active provider.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.resolved_api_key()
            .ok_or_else(|| ConfigError::MissingApiKey(self.provider.clone()))
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout(),
            providers: HashMap::new(),
            gateway: GatewayConfig::default(),
            tutor: TutorConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key for provider '{0}': set GROQ_API_KEY (or TUTORLY_API_KEY) or add api_key to config.toml")]
    MissingApiKey(String),
}
