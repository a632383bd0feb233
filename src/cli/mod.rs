//! Command-line entry point
//!
//! Resolves the run configuration from an optional YAML file plus flag
//! overrides, then hands it to a [`Session`].

mod logging;

pub use logging::{init_tracing, LogLevel};

pub use crate::config::Cli;

use crate::config::{validate_config, TrainingConfig};
use crate::train::{Session, TrainReport};
use crate::Result;

/// Build the effective configuration for `cli`
pub fn resolve_config(cli: &Cli) -> Result<TrainingConfig> {
    let mut config = match &cli.config {
        Some(path) => TrainingConfig::from_yaml_file(path)?,
        None => TrainingConfig::default(),
    };
    cli.apply_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Run one training session as described by `cli`
pub fn run_command(cli: &Cli) -> Result<TrainReport> {
    let config = resolve_config(cli)?;
    tracing::debug!(?config, "Resolved configuration");
    Session::new(config, &cli.data, &cli.labels).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_defaults() {
        let cli = Cli::parse_from(["ecg-gvae", "x.csv", "y.csv"]);
        assert_eq!(resolve_config(&cli).unwrap(), TrainingConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "epochs: 50\nseed: 3\ngraph_every: 7").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["ecg-gvae", "x.csv", "y.csv", "--config", &path, "--epochs", "4"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.epochs, 4);
        assert_eq!(config.seed, 3);
        assert_eq!(config.graph_every, 7);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["ecg-gvae", "x.csv", "y.csv", "--epochs", "0"]);
        assert!(resolve_config(&cli).is_err());
    }
}
