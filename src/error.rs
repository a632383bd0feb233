//! Error types for ecg-gvae

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading data, configuring, or running training
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid data in {path} (row {row}): {message}")]
    Data {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("Cannot stratify: {0}")]
    Stratification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Non-finite {what} at epoch {epoch}, sample {sample}")]
    NonFinite {
        epoch: usize,
        sample: usize,
        what: String,
    },

    #[error("{0} subset is empty")]
    EmptySubset(&'static str),

    #[error("Shape mismatch: {0}")]
    Shape(String),
}

impl Error {
    /// Build a data error for a given file and row
    pub(crate) fn data(path: impl Into<PathBuf>, row: usize, message: impl Into<String>) -> Self {
        Self::Data {
            path: path.into(),
            row,
            message: message.into(),
        }
    }
}
