//! Configuration loading, validation, and management for Archloom.
//!
//! Loads configuration from `~/.archloom/config.toml` with environment
//! variable overrides. Validates all settings at startup — a tier whose
//! provider has no credential is a startup-time fatal condition, never a
//! per-call surprise.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use archloom_core::ModelTier;

/// The root configuration structure.
///
/// Maps directly to `~/.archloom/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fallback API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default temperature for model calls
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per model response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Model tier → {provider, model} mapping
    #[serde(default)]
    pub tiers: TierMap,

    /// Agent runtime settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}

/// Which concrete model satisfies each capability tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierMap {
    #[serde(default = "default_fast")]
    pub fast: TierTarget,

    #[serde(default = "default_balanced")]
    pub balanced: TierTarget,

    #[serde(default = "default_high_quality")]
    pub high_quality: TierTarget,
}

impl TierMap {
    /// Look up the target for a tier.
    pub fn target(&self, tier: ModelTier) -> &TierTarget {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Balanced => &self.balanced,
            ModelTier::HighQuality => &self.high_quality,
        }
    }
}

impl Default for TierMap {
    fn default() -> Self {
        Self {
            fast: default_fast(),
            balanced: default_balanced(),
            high_quality: default_high_quality(),
        }
    }
}

/// A concrete provider/model pair backing a tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierTarget {
    pub provider: String,
    pub model: String,
}

fn default_fast() -> TierTarget {
    TierTarget {
        provider: "anthropic".into(),
        model: "claude-3-5-haiku-20241022".into(),
    }
}
fn default_balanced() -> TierTarget {
    TierTarget {
        provider: "anthropic".into(),
        model: "claude-sonnet-4-20250514".into(),
    }
}
fn default_high_quality() -> TierTarget {
    TierTarget {
        provider: "anthropic".into(),
        model: "claude-opus-4-20250514".into(),
    }
}

/// Agent runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Maximum tool-call rounds per turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Timeout applied to every upstream model call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_tool_rounds() -> u32 {
    8
}
fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Redact a secret string for Debug output.
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
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("tiers", &self.tiers)
            .field("agent", &self.agent)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.archloom/config.toml).
    ///
    /// Environment variables override file settings:
    /// - `ARCHLOOM_API_KEY` — fallback key for any provider
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("ARCHLOOM_API_KEY").ok();
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".archloom")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_tool_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tool_rounds must be at least 1".into(),
            ));
        }

        if self.agent.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "agent.request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Resolve the credential for a provider.
    ///
    /// Precedence: provider-level config key → provider environment
    /// variable (`ANTHROPIC_API_KEY`, `OPENAI_API_KEY`, …) → global
    /// fallback key.
    pub fn credential_for(&self, provider: &str) -> Option<String> {
        if let Some(pc) = self.providers.get(provider) {
            if let Some(key) = &pc.api_key {
                return Some(key.clone());
            }
        }

        let env_name = format!("{}_API_KEY", provider.to_uppercase().replace('-', "_"));
        if let Ok(key) = std::env::var(&env_name) {
            return Some(key);
        }

        self.api_key.clone()
    }

    /// The base URL override for a provider, if configured.
    pub fn base_url_for(&self, provider: &str) -> Option<String> {
        self.providers.get(provider).and_then(|pc| pc.api_url.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            tiers: TierMap::default(),
            agent: AgentSettings::default(),
            providers: HashMap::new(),
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

    #[error("No credential configured for provider '{provider}' (required by tier '{tier}')")]
    MissingCredential { provider: String, tier: String },
}
