//! Configuration management for codeviz.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `codeviz.toml` file
//! 3. User config `~/.config/codeviz/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parse and graph-building limits.
    pub pipeline: PipelineConfig,

    /// Force-directed layout parameters.
    pub layout: LayoutConfig,

    /// HTTP API settings.
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./codeviz.toml` (project local)
    /// 2. `~/.config/codeviz/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply on top of whichever source was used.
    pub fn load() -> Result<Self, ConfigError> {
        // Try project-local config first
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a `CODEVIZ_*` key lookup. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(n) = lookup("CODEVIZ_MAX_DEPTH").and_then(|v| v.parse().ok()) {
            self.pipeline.max_depth = n;
        }
        if let Some(n) = lookup("CODEVIZ_LAYOUT_ITERATIONS").and_then(|v| v.parse().ok()) {
            self.layout.iterations = n;
        }
        if let Some(n) = lookup("CODEVIZ_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = n;
        }
        if let Some(n) = lookup("CODEVIZ_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.server.timeout_secs = n;
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.max_label_len < 4 {
            return Err(ConfigError::Invalid(format!(
                "pipeline.max_label_len must be at least 4, got {}",
                self.pipeline.max_label_len
            )));
        }
        if !(self.layout.scale.is_finite() && self.layout.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "layout.scale must be a positive number, got {}",
                self.layout.scale
            )));
        }
        if let Some(k) = self.layout.spring_length {
            if !(k.is_finite() && k > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "layout.spring_length must be a positive number, got {}",
                    k
                )));
            }
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid("server.timeout_secs must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Parse and graph-building limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Deepest AST level whose children are still visited.
    pub max_depth: usize,

    /// Maximum node label length in characters.
    pub max_label_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_label_len: DEFAULT_MAX_LABEL_LEN,
        }
    }
}

/// Force-directed layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Simulation iterations.
    pub iterations: usize,

    /// Optimal edge length in the unit square.
    /// If not set, uses `1/sqrt(node count)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spring_length: Option<f64>,

    /// Positions are rescaled into `[-scale, scale]`.
    pub scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_LAYOUT_ITERATIONS,
            spring_length: None, // Derived from node count
            scale: DEFAULT_LAYOUT_SCALE,
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Listen port.
    pub port: u16,

    /// Largest accepted source text in bytes.
    pub max_source_bytes: usize,

    /// Wall-clock budget per request.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
