//! Variational graph auto-encoder generator

use super::init::standard_normal;
use super::{GeneratorOutput, GraphConvolution, GraphGenerator, Parameterized};
use crate::autograd::{add, exp, matmul, mul, relu, sigmoid, transpose_t};
use crate::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Layer sizes of the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Features per node
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub latent_dim: usize,
    pub num_nodes: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_dim: 10,
            hidden_dim: 8,
            latent_dim: 6,
            num_nodes: 15,
        }
    }
}

/// Graph VAE: GCN encoder to a Gaussian latent per node, inner-product decoder
///
/// ```text
/// H     = relu(B X W1 + b1)
/// μ     = B H Wμ + bμ
/// log σ = B H Wσ + bσ
/// Z     = μ + ε ⊙ exp(log σ)    (train)   |   Z = μ   (eval)
/// Â     = sigmoid(Z Zᵀ)
/// ```
pub struct VariationalGraphAutoEncoder {
    config: GeneratorConfig,
    encoder: GraphConvolution,
    mean_head: GraphConvolution,
    log_std_head: GraphConvolution,
    rng: StdRng,
    last_latent: Option<(Tensor, Tensor)>,
}

impl VariationalGraphAutoEncoder {
    /// Build with weights and sampling noise drawn from `seed`
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let encoder = GraphConvolution::new(config.input_dim, config.hidden_dim, &mut rng);
        let mean_head = GraphConvolution::new(config.hidden_dim, config.latent_dim, &mut rng);
        let log_std_head = GraphConvolution::new(config.hidden_dim, config.latent_dim, &mut rng);
        Self {
            config,
            encoder,
            mean_head,
            log_std_head,
            rng,
            last_latent: None,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Parameterized for VariationalGraphAutoEncoder {
    fn named_parameters(&self) -> Vec<(&'static str, &Tensor)> {
        vec![
            ("encoder.weight", &self.encoder.weight),
            ("encoder.bias", &self.encoder.bias),
            ("mean.weight", &self.mean_head.weight),
            ("mean.bias", &self.mean_head.bias),
            ("log_std.weight", &self.log_std_head.weight),
            ("log_std.bias", &self.log_std_head.bias),
        ]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![
            &mut self.encoder.weight,
            &mut self.encoder.bias,
            &mut self.mean_head.weight,
            &mut self.mean_head.bias,
            &mut self.log_std_head.weight,
            &mut self.log_std_head.bias,
        ]
    }
}

impl GraphGenerator for VariationalGraphAutoEncoder {
    fn forward(&mut self, base_graph: &Tensor, features: &Tensor, eval: bool) -> GeneratorOutput {
        let n = self.config.num_nodes;
        let d = self.config.latent_dim;
        assert_eq!(base_graph.len(), n * n, "base graph must be n × n");
        assert_eq!(features.len(), n * self.config.input_dim, "features must be n × input_dim");

        let hidden = relu(&self.encoder.forward(base_graph, features, n));
        let mean = self.mean_head.forward(base_graph, &hidden, n);
        let log_std = self.log_std_head.forward(base_graph, &hidden, n);

        let z = if eval {
            mean.clone()
        } else {
            let noise = Tensor::from_vec(standard_normal(n * d, &mut self.rng), false);
            add(&mean, &mul(&noise, &exp(&log_std)))
        };

        let z_t = transpose_t(&z, n, d);
        let graph = sigmoid(&matmul(&z, &z_t, n, d, n));

        self.last_latent = Some((mean.clone(), log_std.clone()));
        GeneratorOutput {
            graph,
            latent_mean: mean,
            latent_log_std: log_std,
        }
    }

    fn last_latent(&self) -> Option<(&Tensor, &Tensor)> {
        self.last_latent.as_ref().map(|(m, s)| (m, s))
    }

    fn num_nodes(&self) -> usize {
        self.config.num_nodes
    }

    fn latent_dim(&self) -> usize {
        self.config.latent_dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{backward, no_grad, sum};
    use crate::graph::BaseGraph;

    fn features(n: usize, dim: usize) -> Tensor {
        Tensor::from_vec((0..n * dim).map(|i| ((i % 7) as f32 - 3.0) * 0.1).collect(), false)
    }

    #[test]
    fn test_forward_shapes_and_range() {
        let config = GeneratorConfig::default();
        let mut gen = VariationalGraphAutoEncoder::new(config, 10);
        let base = BaseGraph::complete(15);
        let out = gen.forward(base.laplacian(), &features(15, 10), false);

        assert_eq!(out.graph.len(), 225);
        assert_eq!(out.latent_mean.len(), 90);
        assert_eq!(out.latent_log_std.len(), 90);
        assert!(out.graph.data().iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_generated_graph_is_symmetric() {
        let mut gen = VariationalGraphAutoEncoder::new(GeneratorConfig::default(), 1);
        let base = BaseGraph::complete(15);
        let out = gen.forward(base.laplacian(), &features(15, 10), false);
        let g = out.graph.data();
        for i in 0..15 {
            for j in 0..15 {
                assert!((g[i * 15 + j] - g[j * 15 + i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_eval_mode_is_deterministic() {
        let mut gen = VariationalGraphAutoEncoder::new(GeneratorConfig::default(), 2);
        let base = BaseGraph::complete(15);
        let x = features(15, 10);
        let a = no_grad(|| gen.forward(base.laplacian(), &x, true));
        let b = no_grad(|| gen.forward(base.laplacian(), &x, true));
        assert_eq!(a.graph.data(), b.graph.data());
    }

    #[test]
    fn test_train_mode_samples_noise() {
        let mut gen = VariationalGraphAutoEncoder::new(GeneratorConfig::default(), 3);
        let base = BaseGraph::complete(15);
        let x = features(15, 10);
        let a = gen.forward(base.laplacian(), &x, false);
        let b = gen.forward(base.laplacian(), &x, false);
        assert_ne!(a.graph.data(), b.graph.data());
    }

    #[test]
    fn test_last_latent_tracks_latest_pass() {
        let mut gen = VariationalGraphAutoEncoder::new(GeneratorConfig::default(), 4);
        assert!(gen.last_latent().is_none());
        let base = BaseGraph::complete(15);
        let out = gen.forward(base.laplacian(), &features(15, 10), true);
        let (mean, log_std) = gen.last_latent().unwrap();
        assert_eq!(mean.data(), out.latent_mean.data());
        assert_eq!(log_std.data(), out.latent_log_std.data());
    }

    #[test]
    fn test_backward_reaches_every_parameter() {
        let mut gen = VariationalGraphAutoEncoder::new(GeneratorConfig::default(), 5);
        let base = BaseGraph::complete(15);
        let out = gen.forward(base.laplacian(), &features(15, 10), false);
        let mut loss = sum(&out.graph);
        backward(&mut loss, None);
        for (name, p) in gen.named_parameters() {
            assert!(p.grad().is_some(), "{name} has no gradient");
        }
        assert_eq!(gen.num_parameters(), 10 * 8 + 8 + 2 * (8 * 6 + 6));
    }
}
