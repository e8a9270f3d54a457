use std::{fs, path::Path};

use gridhmm_core::{ConfigError, ModelConfig, TerrainKind};
use serde::{Deserialize, Serialize};

const DEFAULT_GENERATION_CONFIG_YAML: &str = include_str!("../config/generation.default.yaml");

/// Upper bounds of the uniform draw for each terrain kind.
/// A draw `u` maps to the first kind whose bound is `>= u`; anything above the
/// last bound is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainThresholds {
    pub normal_max: f64,
    pub highway_max: f64,
    pub hard_to_traverse_max: f64,
}

impl Default for TerrainThresholds {
    fn default() -> Self {
        TerrainThresholds {
            normal_max: 0.5,
            highway_max: 0.7,
            hard_to_traverse_max: 0.9,
        }
    }
}

impl TerrainThresholds {
    /// Classify one uniform sample.
    pub fn classify(&self, sample: f64) -> TerrainKind {
        if sample <= self.normal_max {
            TerrainKind::Normal
        } else if sample <= self.highway_max {
            TerrainKind::Highway
        } else if sample <= self.hard_to_traverse_max {
            TerrainKind::HardToTraverse
        } else {
            TerrainKind::Blocked
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let bounds = [
            self.normal_max,
            self.highway_max,
            self.hard_to_traverse_max,
        ];
        if bounds.iter().any(|b| !b.is_finite() || !(0.0..=1.0).contains(b)) {
            return Err(ConfigError::Invalid(
                "terrain thresholds must be within [0, 1]".to_string(),
            ));
        }
        if bounds.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(ConfigError::Invalid(
                "terrain thresholds must be non-decreasing".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for grid and scenario generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub rows: usize,
    pub columns: usize,
    pub steps: usize,
    pub seed: u64,
    pub terrain: TerrainThresholds,
    /// Shared with the filter so both sides use the same probabilities.
    pub model: ModelConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            rows: 50,
            columns: 100,
            steps: 100,
            seed: 12345,
            terrain: TerrainThresholds::default(),
            model: ModelConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Parse a generation config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: GenerationConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a generation config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_GENERATION_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::Invalid(
                "rows and columns must be greater than 0".to_string(),
            ));
        }
        self.terrain.validate()?;
        self.model.validate()
    }
}
