//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use super::TrainingConfig;
use crate::cli::LogLevel;

/// Jointly train a variational graph generator and graph classifier on ECG features
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ecg-gvae")]
#[command(version)]
pub struct Cli {
    /// Headerless CSV with one row of channel features per sample
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Headerless CSV with one 0/1 label per sample
    #[arg(value_name = "LABELS")]
    pub labels: PathBuf,

    /// Prefix for per-epoch history files and graph artifacts
    #[arg(long, value_name = "PREFIX")]
    pub history_path: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override number of epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the best-model output directory
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Write telemetry events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub telemetry: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output except warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Explicit log level; wins over -v/-q
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    pub fn log_level(&self) -> LogLevel {
        match (self.log_level, self.verbose, self.quiet) {
            (Some(level), _, _) => level,
            (None, true, _) => LogLevel::Verbose,
            (None, _, true) => LogLevel::Quiet,
            _ => LogLevel::Normal,
        }
    }

    /// Apply the flags that were given on top of `config`
    pub fn apply_overrides(&self, config: &mut TrainingConfig) {
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(dir) = &self.model_dir {
            config.model_dir = dir.clone();
        }
        if let Some(prefix) = &self.history_path {
            config.history_path = Some(prefix.clone());
        }
        if let Some(path) = &self.telemetry {
            config.telemetry_path = Some(path.clone());
        }
    }
}
