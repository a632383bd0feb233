//! Dense and graph-convolution layers

use crate::autograd::{add_row_broadcast, matmul};
use crate::Tensor;
use rand::Rng;

use super::init::glorot_uniform;

/// Fully connected layer: `Y = X W + b`
#[derive(Debug, Clone)]
pub struct Linear {
    pub(crate) weight: Tensor,
    pub(crate) bias: Tensor,
    in_dim: usize,
    out_dim: usize,
}

impl Linear {
    /// Glorot-initialised weights, zero bias
    pub fn new<R: Rng + ?Sized>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        Self {
            weight: Tensor::from_vec(glorot_uniform(in_dim, out_dim, rng), true),
            bias: Tensor::zeros(out_dim, true),
            in_dim,
            out_dim,
        }
    }

    /// Apply to `rows` input rows (`x` is rows × in_dim)
    pub fn forward(&self, x: &Tensor, rows: usize) -> Tensor {
        let y = matmul(x, &self.weight, rows, self.in_dim, self.out_dim);
        add_row_broadcast(&y, &self.bias, rows, self.out_dim)
    }

    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    pub fn out_dim(&self) -> usize {
        self.out_dim
    }
}

/// Graph convolution: `H' = A (H W) + b`
///
/// `A` is any dense `n × n` propagation matrix (normalized Laplacian for the
/// generator, scaled edge probabilities for the classifier).
#[derive(Debug, Clone)]
pub struct GraphConvolution {
    pub(crate) weight: Tensor,
    pub(crate) bias: Tensor,
    in_dim: usize,
    out_dim: usize,
}

impl GraphConvolution {
    pub fn new<R: Rng + ?Sized>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        Self {
            weight: Tensor::from_vec(glorot_uniform(in_dim, out_dim, rng), true),
            bias: Tensor::zeros(out_dim, true),
            in_dim,
            out_dim,
        }
    }

    pub fn forward(&self, adjacency: &Tensor, x: &Tensor, nodes: usize) -> Tensor {
        let support = matmul(x, &self.weight, nodes, self.in_dim, self.out_dim);
        let propagated = matmul(adjacency, &support, nodes, nodes, self.out_dim);
        add_row_broadcast(&propagated, &self.bias, nodes, self.out_dim)
    }

    pub fn out_dim(&self) -> usize {
        self.out_dim
    }
}
