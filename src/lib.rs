//! Joint training of a variational graph generator and a binary graph
//! classifier on ECG channel features.
//!
//! Each sample's per-channel features drive a graph VAE that produces a dense
//! edge-probability matrix over the channels; a graph convolutional
//! classifier reads that matrix to decide healthy vs. unhealthy. Both models
//! are optimized together against
//!
//! ```text
//! cost = 10 · BCE(prediction, label) + BCE(graph, target) - mean(Σ(1 + 2 log σ - μ² - σ²))
//! ```
//!
//! with a single backward pass per sample and two independent Adam updates.
//!
//! - [`autograd`] - reverse-mode differentiation over flat tensors
//! - [`optim`] - Adam and the multi-step learning-rate schedule
//! - [`nn`] - graph convolution layers, generator and classifier
//! - [`graph`] - base graph, Laplacian, edge statistics
//! - [`data`] - CSV dataset and stratified splitting
//! - [`train`] - loss, metrics, epoch runner, checkpoints, session
//! - [`io`] - parameter snapshots and atomic writes
//! - [`config`] - YAML configuration and CLI arguments

pub mod autograd;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod io;
pub mod nn;
pub mod optim;
pub mod train;

pub use autograd::Tensor;
pub use error::{Error, Result};
