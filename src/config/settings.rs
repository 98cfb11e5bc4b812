//! TOML-based configuration for the engine.
//!
//! Every option has a default, so an empty file (or no file) is valid.
//!
//! Example configuration:
//! ```toml
//! threshold = 0.6
//! default_limit = 10
//! max_conditions_simple = 0
//!
//! [suggestions]
//! max_aggregations = 3
//! max_filters = 2
//! low_cardinality_ratio = 0.2
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Engine configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum similarity (0.0 to 1.0] for a match candidate to be accepted.
    pub threshold: f64,

    /// Row limit used for top-N requests that do not name a number.
    pub default_limit: u64,

    /// Largest condition count that still counts as a simple query.
    pub max_conditions_simple: usize,

    /// Suggestion generator settings.
    pub suggestions: SuggestionSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            default_limit: 10,
            max_conditions_simple: 0,
            suggestions: SuggestionSettings::default(),
        }
    }
}

/// Suggestion generator settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestionSettings {
    /// Cap on aggregation suggestions per table.
    pub max_aggregations: usize,

    /// Cap on equality-filter suggestions per table.
    pub max_filters: usize,

    /// Text columns at or below this uniqueness ratio get filter suggestions.
    pub low_cardinality_ratio: f64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            max_aggregations: 3,
            max_filters: 2,
            low_cardinality_ratio: 0.2,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `QUERYWISE_CONFIG`
    /// 2. `./querywise.toml`
    ///
    /// Falls back to defaults when neither exists.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var("QUERYWISE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("querywise.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(EngineConfig::default())
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_max_conditions_simple(mut self, max: usize) -> Self {
        self.max_conditions_simple = max;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigError::InvalidConfig(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.default_limit == 0 {
            return Err(ConfigError::InvalidConfig(
                "default_limit must be positive".to_string(),
            ));
        }
        let ratio = self.suggestions.low_cardinality_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::InvalidConfig(format!(
                "suggestions.low_cardinality_ratio must be in [0, 1], got {}",
                ratio
            )));
        }
        Ok(())
    }
}
