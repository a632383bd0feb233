//! Binary graph classifier

use super::{GraphClassifier, GraphConvolution, Linear, Parameterized};
use crate::autograd::{mean_rows, relu, scale, sigmoid};
use crate::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Layer sizes of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub input_dim: usize,
    pub hidden_dim_1: usize,
    pub hidden_dim_2: usize,
    pub num_nodes: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_dim: 10,
            hidden_dim_1: 8,
            hidden_dim_2: 6,
            num_nodes: 15,
        }
    }
}

/// Two graph convolutions over the generated graph, mean-pooled to one logit
///
/// The generated probabilities are scaled by `1/n` so propagation averages
/// over neighbours instead of summing.
pub struct BinaryGraphClassifier {
    config: ClassifierConfig,
    gc1: GraphConvolution,
    gc2: GraphConvolution,
    readout: Linear,
}

impl BinaryGraphClassifier {
    pub fn new(config: ClassifierConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let gc1 = GraphConvolution::new(config.input_dim, config.hidden_dim_1, &mut rng);
        let gc2 = GraphConvolution::new(config.hidden_dim_1, config.hidden_dim_2, &mut rng);
        let readout = Linear::new(config.hidden_dim_2, 1, &mut rng);
        Self {
            config,
            gc1,
            gc2,
            readout,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl Parameterized for BinaryGraphClassifier {
    fn named_parameters(&self) -> Vec<(&'static str, &Tensor)> {
        vec![
            ("gc1.weight", &self.gc1.weight),
            ("gc1.bias", &self.gc1.bias),
            ("gc2.weight", &self.gc2.weight),
            ("gc2.bias", &self.gc2.bias),
            ("readout.weight", &self.readout.weight),
            ("readout.bias", &self.readout.bias),
        ]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![
            &mut self.gc1.weight,
            &mut self.gc1.bias,
            &mut self.gc2.weight,
            &mut self.gc2.bias,
            &mut self.readout.weight,
            &mut self.readout.bias,
        ]
    }
}

impl GraphClassifier for BinaryGraphClassifier {
    fn forward(&self, graph: &Tensor, features: &Tensor) -> Tensor {
        let n = self.config.num_nodes;
        assert_eq!(graph.len(), n * n, "graph must be n × n");
        assert_eq!(features.len(), n * self.config.input_dim, "features must be n × input_dim");

        let adjacency = scale(graph, 1.0 / n as f32);
        let h1 = relu(&self.gc1.forward(&adjacency, features, n));
        let h2 = relu(&self.gc2.forward(&adjacency, &h1, n));
        let pooled = mean_rows(&h2, n, self.gc2.out_dim());
        sigmoid(&self.readout.forward(&pooled, 1))
    }
}
