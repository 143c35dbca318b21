//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment variables that override file settings,
/// e.g. `FINALS_STATS__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "FINALS_STATS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to assemble config: {0}")]
    LayerError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Defaults applied when a query leaves a parameter out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefaults {
    /// Earliest year offered, even if the data goes further back
    #[serde(default = "default_minimal_year")]
    pub minimal_year: u16,

    /// Participation threshold for place/medal tables and participation charts
    #[serde(default = "default_min_participations")]
    pub min_participations: u32,

    /// Threshold for the distinct-finalists chart
    #[serde(default = "default_min_finalists")]
    pub min_finalists: u32,

    /// Rows shown by truncated rankings
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

fn default_minimal_year() -> u16 {
    2010
}

fn default_min_participations() -> u32 {
    10
}

fn default_min_finalists() -> u32 {
    5
}

fn default_display_limit() -> usize {
    50
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            minimal_year: default_minimal_year(),
            min_participations: default_min_participations(),
            min_finalists: default_min_finalists(),
            display_limit: default_display_limit(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub defaults: QueryDefaults,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/data-2006-2024.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            defaults: QueryDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: the optional TOML file, then `FINALS_STATS__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.defaults.display_limit == 0 {
            return Err(ConfigError::ValidationError(
                "Display limit must be greater than 0".to_string(),
            ));
        }

        if self.defaults.min_participations == 0 {
            return Err(ConfigError::ValidationError(
                "Minimum participations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
