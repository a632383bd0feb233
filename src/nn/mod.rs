//! Graph neural network models
//!
//! The training core only talks to models through [`GraphGenerator`] and
//! [`GraphClassifier`]. The concrete [`VariationalGraphAutoEncoder`] and
//! [`BinaryGraphClassifier`] are small graph-convolution networks built on
//! the crate's autograd tensors.

mod classifier;
mod generator;
mod init;
mod layers;

pub use classifier::{BinaryGraphClassifier, ClassifierConfig};
pub use generator::{GeneratorConfig, VariationalGraphAutoEncoder};
pub use init::{glorot_uniform, standard_normal};
pub use layers::{GraphConvolution, Linear};

use crate::Tensor;

/// A model with named, trainable parameters
pub trait Parameterized {
    /// Parameters in a stable order, paired with their names
    fn named_parameters(&self) -> Vec<(&'static str, &Tensor)>;

    /// Mutable parameters, in the same order as [`named_parameters`](Self::named_parameters)
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// Total number of scalar parameters
    fn num_parameters(&self) -> usize {
        self.named_parameters().iter().map(|(_, t)| t.len()).sum()
    }

    /// True when every parameter gradient present is finite
    fn gradients_finite(&self) -> bool {
        self.named_parameters()
            .iter()
            .all(|(_, t)| t.grad().is_none_or(|g| g.iter().all(|v| v.is_finite())))
    }
}

/// Output of one generator forward pass
#[derive(Debug, Clone)]
pub struct GeneratorOutput {
    /// Dense `n × n` edge probabilities
    pub graph: Tensor,
    /// Latent mean, `n × latent_dim`
    pub latent_mean: Tensor,
    /// Latent log standard deviation, `n × latent_dim`
    pub latent_log_std: Tensor,
}

/// Generator collaborator: features + base graph -> probabilistic adjacency
pub trait GraphGenerator: Parameterized {
    /// Run the generator. `eval` switches latent sampling off (the mean is used).
    fn forward(&mut self, base_graph: &Tensor, features: &Tensor, eval: bool) -> GeneratorOutput;

    /// Latent mean and log-std from the most recent forward pass
    fn last_latent(&self) -> Option<(&Tensor, &Tensor)>;

    fn num_nodes(&self) -> usize;

    /// Columns of the latent matrices
    fn latent_dim(&self) -> usize;
}

/// Classifier collaborator: generated graph + features -> probability of class 1
pub trait GraphClassifier: Parameterized {
    /// Returns a single-element tensor in `[0, 1]`
    fn forward(&self, graph: &Tensor, features: &Tensor) -> Tensor;
}
