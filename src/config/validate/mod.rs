//! Configuration validation
//!
//! Validates a training configuration before any data is loaded.

mod error;
mod validator;


pub use error::ValidationError;
pub use validator::validate_config;
