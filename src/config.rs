//! Configuration Module
//!
//! Provides TOML-based configuration for nids-lab.
//! Configuration is optional - every section falls back to defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::{DEFAULT_ATTACK_RATIO, DEFAULT_SEED, DEFAULT_SIZE};
use crate::export::OutputFormat;
use crate::forest::ForestParams;

/// Upper bound for `ui.preview_rows`.
pub const MAX_PREVIEW_ROWS: usize = 100;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub model: ModelConfig,
    pub ui: UiConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Generates a default configuration file content
    pub fn generate_default() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| "# Failed to generate config".to_string())
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.dataset.size == 0 {
            anyhow::bail!("dataset.size must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.dataset.attack_ratio) {
            anyhow::bail!("dataset.attack_ratio must be between 0.0 and 1.0");
        }
        if self.model.n_estimators == 0 {
            anyhow::bail!("model.n_estimators must be greater than 0");
        }
        if self.model.test_ratio <= 0.0 || self.model.test_ratio >= 1.0 {
            anyhow::bail!("model.test_ratio must be between 0.0 and 1.0 (exclusive)");
        }
        if self.model.min_samples_split < 2 {
            anyhow::bail!("model.min_samples_split must be at least 2");
        }
        if self.model.max_depth == Some(0) {
            anyhow::bail!("model.max_depth must be greater than 0 when set");
        }
        if !(1..=MAX_PREVIEW_ROWS).contains(&self.ui.preview_rows) {
            anyhow::bail!("ui.preview_rows must be between 1 and {}", MAX_PREVIEW_ROWS);
        }
        Ok(())
    }
}

/// Synthetic dataset configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Generator seed
    pub seed: u64,
    /// Number of records to generate
    pub size: usize,
    /// Probability that a record is labeled as an attack
    pub attack_ratio: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            size: DEFAULT_SIZE,
            attack_ratio: DEFAULT_ATTACK_RATIO,
        }
    }
}

/// Classifier and evaluation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of trees in the forest
    pub n_estimators: usize,
    /// Seed for bootstrap sampling and feature selection
    pub forest_seed: u64,
    /// Fraction of records held out for evaluation
    pub test_ratio: f64,
    /// Seed for the train/test shuffle
    pub split_seed: u64,
    /// Maximum tree depth (unset = grow until pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
}

impl ModelConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            seed: self.forest_seed,
            bootstrap: true,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            forest_seed: 42,
            test_ratio: 0.3,
            split_seed: 42,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Interactive surface configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Rows shown in the dataset preview
    pub preview_rows: usize,
    /// Input poll interval in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            tick_rate_ms: 100,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format (text, json, jsonl)
    #[serde(with = "output_format_serde")]
    pub format: OutputFormat,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            verbose: false,
        }
    }
}

/// Custom serde implementation for OutputFormat
mod output_format_serde {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(format: &OutputFormat, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.dataset.seed, 42);
        assert_eq!(config.dataset.size, 1000);
        assert_eq!(config.model.n_estimators, 100);
        assert_eq!(config.model.test_ratio, 0.3);
        assert_eq!(config.ui.preview_rows, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        config.model.n_estimators = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.test_ratio = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dataset.attack_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dataset.size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.max_depth = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ui.preview_rows = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ui.preview_rows = 65_535;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ui.preview_rows = MAX_PREVIEW_ROWS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_default_config() {
        let config_str = Config::generate_default();
        assert!(config_str.contains("[dataset]"));
        assert!(config_str.contains("[model]"));
        assert!(config_str.contains("[ui]"));
        assert!(config_str.contains("[output]"));

        let parsed: Config = toml::from_str(&config_str).unwrap();
        assert_eq!(parsed.model.n_estimators, 100);
        assert_eq!(parsed.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[dataset]
seed = 7
size = 250

[model]
n_estimators = 20
max_depth = 6

[output]
format = "jsonl"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dataset.seed, 7);
        assert_eq!(config.dataset.size, 250);
        assert_eq!(config.dataset.attack_ratio, 0.3);
        assert_eq!(config.model.n_estimators, 20);
        assert_eq!(config.model.max_depth, Some(6));
        assert_eq!(config.model.split_seed, 42);
        assert_eq!(config.output.format, OutputFormat::JsonLines);

        let params = config.model.forest_params();
        assert_eq!(params.n_estimators, 20);
        assert_eq!(params.max_depth, Some(6));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ui]\npreview_rows = 12").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.ui.preview_rows, 12);

        assert!(Config::load(Path::new("/nonexistent/nids-lab.toml")).is_err());
    }
}
