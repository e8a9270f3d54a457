use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MODEL_CONFIG_YAML: &str = include_str!("../../config/model.default.yaml");

/// Transition and sensor parameters.
/// The scenario generator and the filter must share one of these for the filter
/// to be a correct model of the generated data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Probability that an attempted move into an open cell succeeds.
    pub move_success: f64,
    /// Likelihood factor for a cell whose terrain matches the reading.
    pub sensor_match: f64,
    /// Flat likelihood factor for a cell whose terrain does not match the reading.
    /// Applied to each non-matching kind; it is not a normalized conditional.
    pub sensor_mismatch: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            move_success: 0.9,
            sensor_match: 0.9,
            sensor_mismatch: 0.05,
        }
    }
}

impl ModelConfig {
    /// Probability that an attempted move leaves the agent where it was.
    pub fn move_failure(&self) -> f64 {
        1.0 - self.move_success
    }

    /// Parse a model config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ModelConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a model config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_MODEL_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("move_success", self.move_success)?;
        check_probability("sensor_match", self.sensor_match)?;
        check_probability("sensor_mismatch", self.sensor_mismatch)?;
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Error type for loading and validating YAML configs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
