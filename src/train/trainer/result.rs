//! Epoch and run result types

use super::core::Mode;
use crate::train::metrics::ConfusionMatrix;
use ndarray::Array1;

/// Averages and scores of one finished pass
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    pub mode: Mode,
    pub epoch: usize,
    /// Mean total cost
    pub loss: f32,
    pub reconstruction: f32,
    pub kl: f32,
    pub classification: f32,
    /// Mean undirected edge count of the generated graphs
    pub edges: f32,
    /// F1 at the decision threshold
    pub score: f32,
    /// Present for EVAL passes only
    pub confusion: Option<ConfusionMatrix>,
    /// Generated graph of the last processed sample
    pub last_graph: Array1<f32>,
    /// Samples that contributed to the averages
    pub samples: usize,
    /// Samples dropped under the skip policy
    pub skipped: usize,
}

/// Result of a full training session
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Number of epochs completed
    pub epochs: usize,
    /// Best validation score, `None` if nothing was ever saved
    pub best_score: Option<f32>,
    pub best_epoch: Option<usize>,
    pub final_train: Option<EpochSummary>,
    pub final_validation: Option<EpochSummary>,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
