//! Log level selection and subscriber setup

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Verbosity chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    /// Warnings and errors only
    Quiet,
    /// Epoch summaries and checkpoint saves
    #[default]
    Normal,
    /// Per-sample diagnostics
    Verbose,
}

impl LogLevel {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Quiet => LevelFilter::WARN,
            LogLevel::Normal => LevelFilter::INFO,
            LogLevel::Verbose => LevelFilter::DEBUG,
        }
    }
}

/// Install the global fmt subscriber
///
/// `RUST_LOG` takes precedence over `level` when set. Returns `false` if a
/// subscriber was already installed.
pub fn init_tracing(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.level_filter().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
