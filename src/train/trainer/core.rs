//! Runner configuration and the jointly trained model pair

use crate::config::{NonFinitePolicy, TrainingConfig};
use crate::graph::BaseGraph;
use crate::nn::{GraphClassifier, GraphGenerator};
use crate::optim::ModelOptimizer;
use crate::train::loss::CompositeLoss;
use std::fmt;

/// Whether a pass updates parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Gradients tracked, both optimizers stepped per sample
    Train,
    /// No gradient tracking, no updates, deterministic latent
    Eval,
}

impl Mode {
    pub fn is_eval(self) -> bool {
        self == Mode::Eval
    }

    /// Series name used in history files and telemetry
    pub fn series(self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Eval => "validation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Train => write!(f, "Training"),
            Mode::Eval => write!(f, "Validation"),
        }
    }
}

/// Generator and classifier, each with its own update rule
///
/// Both models hang off one computational graph per sample; a single
/// backward fills both gradient sets before the two optimizers step.
pub struct JointModel<G, C> {
    pub generator: G,
    pub classifier: C,
    pub generator_optimizer: ModelOptimizer,
    pub classifier_optimizer: ModelOptimizer,
}

impl<G: GraphGenerator, C: GraphClassifier> JointModel<G, C> {
    pub fn new(
        generator: G,
        classifier: C,
        generator_optimizer: ModelOptimizer,
        classifier_optimizer: ModelOptimizer,
    ) -> Self {
        Self {
            generator,
            classifier,
            generator_optimizer,
            classifier_optimizer,
        }
    }

    /// Advance both learning-rate schedules
    pub fn end_epoch(&mut self) {
        self.generator_optimizer.end_epoch();
        self.classifier_optimizer.end_epoch();
    }
}

/// Drives one epoch over a subset of the dataset
#[derive(Debug, Clone)]
pub struct EpochRunner<'a> {
    pub(crate) base: &'a BaseGraph,
    pub(crate) loss: CompositeLoss,
    pub(crate) decision_threshold: f32,
    pub(crate) edge_threshold: f32,
    pub(crate) non_finite: NonFinitePolicy,
}

impl<'a> EpochRunner<'a> {
    /// Runner with the default loss weighting and thresholds (0.55 / 0.5)
    pub fn new(base: &'a BaseGraph) -> Self {
        Self {
            base,
            loss: CompositeLoss::default(),
            decision_threshold: 0.55,
            edge_threshold: 0.5,
            non_finite: NonFinitePolicy::Abort,
        }
    }

    pub fn from_config(base: &'a BaseGraph, config: &TrainingConfig) -> Self {
        Self::new(base)
            .with_loss(CompositeLoss::new(config.classification_weight))
            .with_thresholds(config.decision_threshold, config.edge_threshold)
            .with_non_finite(config.non_finite)
    }

    pub fn with_loss(mut self, loss: CompositeLoss) -> Self {
        self.loss = loss;
        self
    }

    /// Set the classification decision threshold and the edge threshold
    pub fn with_thresholds(mut self, decision: f32, edge: f32) -> Self {
        self.decision_threshold = decision;
        self.edge_threshold = edge;
        self
    }

    pub fn with_non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }
}
