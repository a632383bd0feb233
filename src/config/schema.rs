//! YAML schema for a training run

use crate::nn::{ClassifierConfig, GeneratorConfig};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when a loss component or gradient is NaN or infinite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonFinitePolicy {
    /// Stop the run with [`Error::NonFinite`]
    #[default]
    Abort,
    /// Log a warning, leave the parameters untouched and drop the sample
    /// from the epoch's statistics
    Skip,
}

/// Adam settings for one of the two models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub lr: f32,
    /// L2 penalty added to the gradient; 0 disables it
    pub weight_decay: f32,
    /// Epochs at which the learning rate is multiplied by `gamma`
    pub milestones: Vec<usize>,
    pub gamma: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            lr: 1e-4,
            weight_decay: 0.0,
            milestones: Vec::new(),
            gamma: 0.5,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    /// Seeds weight init, latent sampling and train-order shuffling
    pub seed: u64,
    /// Seeds the stratified split only
    pub split_seed: u64,
    pub val_fraction: f64,

    /// Predictions strictly above this count as class 1
    pub decision_threshold: f32,
    /// Generated edges strictly above this count as present
    pub edge_threshold: f32,

    pub num_nodes: usize,
    pub feature_dim: usize,
    pub hidden_dim_1: usize,
    pub hidden_dim_2: usize,

    pub generator: OptimizerConfig,
    pub classifier: OptimizerConfig,
    pub classification_weight: f32,

    /// Write a graph artifact every N epochs (needs `history_path`)
    pub graph_every: usize,
    pub shuffle_train: bool,
    pub shuffle_validation: bool,
    pub non_finite: NonFinitePolicy,

    pub model_dir: PathBuf,
    /// Prefix for history files and graph artifacts
    pub history_path: Option<PathBuf>,
    /// Newline-delimited JSON telemetry output
    pub telemetry_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 10_000,
            seed: 10,
            split_seed: 60,
            val_fraction: 0.2,
            decision_threshold: 0.55,
            edge_threshold: 0.5,
            num_nodes: 15,
            feature_dim: 10,
            hidden_dim_1: 8,
            hidden_dim_2: 6,
            generator: OptimizerConfig::default(),
            classifier: OptimizerConfig::default(),
            classification_weight: 10.0,
            graph_every: 3,
            shuffle_train: true,
            shuffle_validation: false,
            non_finite: NonFinitePolicy::Abort,
            model_dir: PathBuf::from("models"),
            history_path: None,
            telemetry_path: None,
        }
    }
}

impl TrainingConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::Serialization(format!("YAML serialization failed: {e}")))
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            input_dim: self.feature_dim,
            hidden_dim: self.hidden_dim_1,
            latent_dim: self.hidden_dim_2,
            num_nodes: self.num_nodes,
        }
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            input_dim: self.feature_dim,
            hidden_dim_1: self.hidden_dim_1,
            hidden_dim_2: self.hidden_dim_2,
            num_nodes: self.num_nodes,
        }
    }
}
