//! ecg-gvae CLI
//!
//! # Usage
//!
//! ```bash
//! # Train with the built-in defaults
//! ecg-gvae features.csv labels.csv --history-path runs/exp1
//!
//! # Train from a YAML config with overrides
//! ecg-gvae features.csv labels.csv --config train.yaml --epochs 500 -v
//! ```

use clap::Parser;
use ecg_gvae::cli::{init_tracing, run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run_command(&cli) {
        Ok(report) => {
            tracing::info!(
                "Done: {} epochs, best validation F1 {}",
                report.epochs,
                report
                    .best_score
                    .map_or_else(|| "n/a".to_string(), |s| format!("{s:.4}"))
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
