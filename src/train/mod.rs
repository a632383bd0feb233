//! Joint training of the graph generator and the graph classifier
//!
//! This module provides:
//! - The composite loss (reconstruction BCE, latent KL, weighted classification BCE)
//! - Thresholded F1 / confusion-matrix metrics
//! - The epoch runner with TRAIN and EVAL modes
//! - Best-model checkpointing on strict validation improvement
//! - History files, telemetry and the per-run context
//! - Session orchestration
//!
//! # Example
//!
//! ```no_run
//! use ecg_gvae::config::TrainingConfig;
//! use ecg_gvae::train::Session;
//!
//! let report = Session::new(TrainingConfig::default(), "x.csv", "y.csv").run()?;
//! println!("{} epochs, best F1 {:?}", report.epochs, report.best_score);
//! # Ok::<(), ecg_gvae::Error>(())
//! ```

mod checkpoint;
mod context;
mod history;
mod loss;
mod metrics;
mod session;
pub mod telemetry;
mod trainer;

pub use checkpoint::BestModelTracker;
pub use context::RunContext;
pub use history::{prefixed_path, HistoryWriter};
pub use loss::{
    binary_cross_entropy, kl_standard_normal, BinaryCrossEntropy, CompositeLoss, LossBreakdown,
    LossFn, LossInputs, BCE_EPSILON,
};
pub use metrics::{f1_score, threshold_predictions, ConfusionMatrix};
pub use session::{build_optimizer, Session};
pub use telemetry::{JsonlTelemetry, NullTelemetry, TelemetrySink, Window};
pub use trainer::{EpochRunner, EpochSummary, JointModel, Mode, TrainReport};
