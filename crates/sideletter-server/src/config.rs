//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files: bind address, system prompt location, log
//! capacity, and the retrieval / generation backends. Every field has a
//! default, so an empty file (or no file) is a valid configuration. API keys
//! are never read from the file; they come from the environment.

use serde::Deserialize;
use sideletter_orchestrator::OrchestratorConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub bind_address: String,

    /// Bind port (default: 5000, overridden by `PORT`)
    pub bind_port: u16,

    /// File holding the system prompt
    pub system_prompt_path: PathBuf,

    /// Maximum number of interactions kept in memory
    pub log_capacity: usize,

    /// Query pipeline settings
    pub pipeline: OrchestratorConfig,

    /// Retrieval backend settings
    pub retrieval: RetrievalSettings,

    /// Generation backend settings
    pub generation: GenerationSettings,
}

/// Retrieval backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// API root
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Generation backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// API root
    pub base_url: String,

    /// Chat model
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Output cap in tokens
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 5000,
            system_prompt_path: PathBuf::from(sideletter_llm::prompt::DEFAULT_SYSTEM_PROMPT_PATH),
            log_capacity: sideletter_log::DEFAULT_CAPACITY,
            pipeline: OrchestratorConfig::default(),
            retrieval: RetrievalSettings::default(),
            generation: GenerationSettings::default(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            base_url: sideletter_retrieval::DEFAULT_BASE_URL.to_string(),
            timeout_secs: sideletter_retrieval::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: sideletter_llm::DEFAULT_BASE_URL.to_string(),
            model: sideletter_llm::DEFAULT_MODEL.to_string(),
            temperature: sideletter_llm::DEFAULT_TEMPERATURE,
            max_tokens: sideletter_llm::DEFAULT_MAX_TOKENS,
            timeout_secs: sideletter_llm::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PORT` from the environment, if set
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(port) = std::env::var("PORT") {
            self.bind_port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {}", port)))?;
        }
        Ok(self)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid(
                "log_capacity must be greater than 0".to_string(),
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "generation.max_tokens must be greater than 0".to_string(),
            ));
        }
        self.pipeline.validate().map_err(ConfigError::Invalid)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
