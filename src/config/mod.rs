//! Training configuration
//!
//! A [`TrainingConfig`] is read from YAML (every field optional, falling back
//! to the defaults the model was tuned with), overridden from the command
//! line, then checked by [`validate_config`] before any data is loaded.

mod cli;
mod schema;
mod validate;

pub use cli::Cli;
pub use schema::{NonFinitePolicy, OptimizerConfig, TrainingConfig};
pub use validate::{validate_config, ValidationError};
