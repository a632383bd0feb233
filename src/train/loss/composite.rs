//! Joint generator/classifier objective

use super::{binary_cross_entropy, kl_standard_normal};
use crate::autograd::{add, scale};
use crate::Tensor;

/// Everything one sample contributes to the loss
pub struct LossInputs<'a> {
    /// Generated `n × n` edge probabilities
    pub generated_graph: &'a Tensor,
    /// Reconstruction target with entries in {0, 1}
    pub target_graph: &'a Tensor,
    /// 1-element classifier probability
    pub prediction: &'a Tensor,
    /// 1-element 0/1 label
    pub label: &'a Tensor,
    pub latent_mean: &'a Tensor,
    pub latent_log_std: &'a Tensor,
    pub num_nodes: usize,
    pub latent_dim: usize,
}

/// Total cost plus its raw components
#[derive(Debug, Clone)]
pub struct LossBreakdown {
    /// Scalar to backpropagate
    pub total: Tensor,
    pub reconstruction: f32,
    /// Reported regularizer, `-mean(sum(1 + 2ls - m² - e^{2ls}))`, never negative
    pub kl: f32,
    pub classification: f32,
}

impl LossBreakdown {
    /// Name of the first non-finite component, if any
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("total loss", self.total.item()),
            ("reconstruction loss", self.reconstruction),
            ("KL term", self.kl),
            ("classification loss", self.classification),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// `w · classification + reconstruction - kl_term`
///
/// `kl_term` is the non-positive ELBO regularizer, so subtracting it adds a
/// penalty that vanishes when the latent matches the standard normal prior.
#[derive(Debug, Clone, Copy)]
pub struct CompositeLoss {
    classification_weight: f32,
}

impl Default for CompositeLoss {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl CompositeLoss {
    pub fn new(classification_weight: f32) -> Self {
        Self {
            classification_weight,
        }
    }

    pub fn classification_weight(&self) -> f32 {
        self.classification_weight
    }

    pub fn compute(&self, inputs: &LossInputs<'_>) -> LossBreakdown {
        let reconstruction = binary_cross_entropy(inputs.generated_graph, inputs.target_graph);
        let kl_term = kl_standard_normal(
            inputs.latent_mean,
            inputs.latent_log_std,
            inputs.num_nodes,
            inputs.latent_dim,
        );
        let classification = binary_cross_entropy(inputs.prediction, inputs.label);

        let total = add(
            &add(&scale(&classification, self.classification_weight), &reconstruction),
            &scale(&kl_term, -1.0),
        );

        LossBreakdown {
            reconstruction: reconstruction.item(),
            kl: -kl_term.item(),
            classification: classification.item(),
            total,
        }
    }
}
