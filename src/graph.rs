//! Base graph construction and structural statistics over generated graphs

use crate::Tensor;
use ndarray::{Array1, Array2};
use std::fmt::Write;

/// The fixed input structure shared by every forward pass
///
/// A complete graph over `n` nodes (self-loops included) together with its
/// symmetric normalized Laplacian `L = I - D^-1/2 A D^-1/2`. Both are built
/// once and never mutated.
#[derive(Debug, Clone)]
pub struct BaseGraph {
    num_nodes: usize,
    adjacency: Tensor,
    laplacian: Tensor,
}

impl BaseGraph {
    pub fn complete(num_nodes: usize) -> Self {
        let adjacency = Array2::<f32>::ones((num_nodes, num_nodes));
        let laplacian = normalized_laplacian(&adjacency);
        Self {
            num_nodes,
            adjacency: Tensor::constant(flatten(adjacency)),
            laplacian: Tensor::constant(flatten(laplacian)),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Row-major `n × n` adjacency, used as the reconstruction target
    pub fn adjacency(&self) -> &Tensor {
        &self.adjacency
    }

    /// Row-major `n × n` normalized Laplacian, fed to the generator
    pub fn laplacian(&self) -> &Tensor {
        &self.laplacian
    }
}

fn flatten(m: Array2<f32>) -> Array1<f32> {
    m.into_iter().collect()
}

/// `I - D^-1/2 A D^-1/2`; isolated nodes get a zero scaling
pub fn normalized_laplacian(adjacency: &Array2<f32>) -> Array2<f32> {
    let n = adjacency.nrows();
    let inv_sqrt_deg: Array1<f32> = adjacency
        .sum_axis(ndarray::Axis(1))
        .mapv(|d| if d > 0.0 { d.sqrt().recip() } else { 0.0 });

    let mut laplacian = Array2::<f32>::eye(n);
    for ((i, j), a) in adjacency.indexed_iter() {
        laplacian[[i, j]] -= inv_sqrt_deg[i] * a * inv_sqrt_deg[j];
    }
    laplacian
}

/// Boolean adjacency of entries strictly above `threshold`, diagonal cleared
pub fn thresholded_adjacency(graph: &Array1<f32>, num_nodes: usize, threshold: f32) -> Array2<bool> {
    assert_eq!(graph.len(), num_nodes * num_nodes, "graph must be n × n");
    Array2::from_shape_fn((num_nodes, num_nodes), |(i, j)| {
        i != j && graph[i * num_nodes + j] > threshold
    })
}

/// Undirected edge count: off-diagonal entries above `threshold`, halved
///
/// For a symmetric graph this equals the number of unordered node pairs
/// whose edge probability exceeds the threshold.
pub fn structural_edge_count(graph: &Array1<f32>, num_nodes: usize, threshold: f32) -> f32 {
    let directed = thresholded_adjacency(graph, num_nodes, threshold)
        .iter()
        .filter(|&&edge| edge)
        .count();
    directed as f32 / 2.0
}

/// Graphviz rendering of the thresholded graph
///
/// Edges are undirected; each pair appears once, labelled with the mean of
/// the two directed probabilities.
pub fn to_dot(name: &str, graph: &Array1<f32>, num_nodes: usize, threshold: f32) -> String {
    let edges = thresholded_adjacency(graph, num_nodes, threshold);
    let mut out = String::new();
    let _ = writeln!(out, "graph \"{name}\" {{");
    for node in 0..num_nodes {
        let _ = writeln!(out, "  {node};");
    }
    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            if edges[[i, j]] || edges[[j, i]] {
                let p = 0.5 * (graph[i * num_nodes + j] + graph[j * num_nodes + i]);
                let _ = writeln!(out, "  {i} -- {j} [label=\"{p:.2}\"];");
            }
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_complete_graph_laplacian() {
        let base = BaseGraph::complete(15);
        let l = base.laplacian().data();
        // D = 15 everywhere, so L = I - J/15
        for i in 0..15 {
            for j in 0..15 {
                let expected = if i == j { 1.0 - 1.0 / 15.0 } else { -1.0 / 15.0 };
                assert_abs_diff_eq!(l[i * 15 + j], expected, epsilon = 1e-6);
            }
        }
        assert!(base.adjacency().data().iter().all(|&a| a == 1.0));
        assert!(!base.laplacian().requires_grad());
    }

    #[test]
    fn test_laplacian_isolated_node() {
        let mut a = Array2::<f32>::zeros((3, 3));
        a[[0, 1]] = 1.0;
        a[[1, 0]] = 1.0;
        let l = normalized_laplacian(&a);
        assert_abs_diff_eq!(l[[0, 1]], -1.0);
        assert_abs_diff_eq!(l[[2, 2]], 1.0);
        assert_abs_diff_eq!(l[[2, 0]], 0.0);
    }

    #[test]
    fn test_edge_count_ignores_diagonal() {
        let n = 15;
        let graph = Array1::from_shape_fn(n * n, |k| if k / n == k % n { 1.0 } else { 0.9 });
        assert_eq!(structural_edge_count(&graph, n, 0.5), 105.0);
    }

    #[test]
    fn test_edge_count_threshold_is_strict() {
        let graph = Array1::from(vec![1.0, 0.5, 0.5, 1.0]);
        assert_eq!(structural_edge_count(&graph, 2, 0.5), 0.0);
        let graph = Array1::from(vec![1.0, 0.51, 0.51, 1.0]);
        assert_eq!(structural_edge_count(&graph, 2, 0.5), 1.0);
    }

    #[test]
    fn test_to_dot_lists_edges_once() {
        let graph = Array1::from(vec![
            1.0, 0.8, 0.1, //
            0.8, 1.0, 0.2, //
            0.1, 0.2, 1.0,
        ]);
        let dot = to_dot("g", &graph, 3, 0.5);
        assert!(dot.starts_with("graph \"g\" {"));
        assert_eq!(dot.matches("--").count(), 1);
        assert!(dot.contains("0 -- 1 [label=\"0.80\"]"));
    }
}
