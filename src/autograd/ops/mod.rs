//! Autograd operations with backward passes
//!
//! This module provides differentiable operations for automatic differentiation.

mod activations;
mod basic;
mod matmul;
mod reduce;

pub use activations::{exp, relu, sigmoid};
pub use basic::{add, add_row_broadcast, mul, scale, sum};
pub use matmul::{matmul, matmul_compute, transpose, transpose_t};
pub use reduce::mean_rows;
