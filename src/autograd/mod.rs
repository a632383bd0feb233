//! Tape-based autograd engine
//!
//! Provides reverse-mode automatic differentiation over flat `f32` tensors.
//! Every operation records a [`BackwardOp`] on its output; [`backward`] walks
//! the recorded graph in topological order so that tensors feeding several
//! operations receive the sum of all gradient contributions.
//!
//! ```
//! use ecg_gvae::autograd::{backward, mul, sum, Tensor};
//!
//! let x = Tensor::from_vec(vec![2.0, 3.0], true);
//! let mut y = sum(&mul(&x, &x));
//! backward(&mut y, None);
//! assert_eq!(x.grad().unwrap().to_vec(), vec![4.0, 6.0]);
//! ```
//!
//! Evaluation passes run under [`no_grad`], which stops graph construction.

mod backward;
mod context;
mod ops;
mod tensor;

#[cfg(test)]
mod tests;

pub use backward::{backward, BackwardOp};
pub use context::{is_grad_enabled, no_grad, NoGradGuard};
pub use ops::*;
pub use tensor::{GradCell, Tensor};
