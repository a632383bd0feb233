//! Matrix multiplication and transpose autograd operations
//!
//! Matrices are flat row-major tensors; dimensions are passed explicitly.
//! Dense products go through `ndarray`'s `dot`.

use crate::autograd::{BackwardOp, Tensor};
use ndarray::{Array1, ArrayView2};
use std::cell::RefCell;
use std::rc::Rc;

fn view2(data: &Array1<f32>, rows: usize, cols: usize) -> ArrayView2<'_, f32> {
    data.view()
        .into_shape_with_order((rows, cols))
        .expect("flat buffer matches the declared matrix shape")
}

/// Transpose a row-major matrix (rows x cols) to (cols x rows)
pub fn transpose(data: &Array1<f32>, rows: usize, cols: usize) -> Array1<f32> {
    assert_eq!(data.len(), rows * cols, "transpose: size mismatch");
    view2(data, rows, cols).t().iter().copied().collect()
}

/// Compute C = A @ B on flat buffers
pub fn matmul_compute(a: &Array1<f32>, b: &Array1<f32>, m: usize, k: usize, n: usize) -> Array1<f32> {
    let c = view2(a, m, k).dot(&view2(b, k, n));
    c.iter().copied().collect()
}

/// Matrix multiplication
///
/// Computes C = A @ B where:
/// - A is m×k (flattened to length m*k)
/// - B is k×n (flattened to length k*n)
/// - C is m×n (flattened to length m*n)
pub fn matmul(a: &Tensor, b: &Tensor, m: usize, k: usize, n: usize) -> Tensor {
    assert_eq!(a.len(), m * k, "Matrix A size mismatch");
    assert_eq!(b.len(), k * n, "Matrix B size mismatch");

    let data = matmul_compute(a.data(), b.data(), m, k, n);
    let requires_grad = a.requires_grad() || b.requires_grad();
    let mut result = Tensor::new(data, requires_grad);

    if result.requires_grad() {
        let backward_op = Rc::new(MatmulBackward {
            a: a.clone(),
            b: b.clone(),
            m,
            k,
            n,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct MatmulBackward {
    a: Tensor,
    b: Tensor,
    m: usize,
    k: usize,
    n: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            let (m, k, n) = (self.m, self.k, self.n);
            if self.a.requires_grad() {
                // ∂L/∂A = ∂L/∂C @ B^T  (m×n @ n×k)
                let b_t = transpose(self.b.data(), k, n);
                self.a.accumulate_grad(matmul_compute(grad, &b_t, m, n, k));
            }
            if self.b.requires_grad() {
                // ∂L/∂B = A^T @ ∂L/∂C  (k×m @ m×n)
                let a_t = transpose(self.a.data(), m, k);
                self.b.accumulate_grad(matmul_compute(&a_t, grad, k, m, n));
            }
        }
    }

    fn inputs(&self) -> Vec<&Tensor> {
        vec![&self.a, &self.b]
    }
}

/// Differentiable transpose of a rows × cols matrix
pub fn transpose_t(a: &Tensor, rows: usize, cols: usize) -> Tensor {
    let data = transpose(a.data(), rows, cols);
    let mut result = Tensor::new(data, a.requires_grad());

    if result.requires_grad() {
        let backward_op = Rc::new(TransposeBackward {
            a: a.clone(),
            rows,
            cols,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct TransposeBackward {
    a: Tensor,
    rows: usize,
    cols: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for TransposeBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                // Output is cols × rows; transpose the gradient back
                self.a.accumulate_grad(transpose(grad, self.cols, self.rows));
            }
        }
    }

    fn inputs(&self) -> Vec<&Tensor> {
        vec![&self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_transpose_2x3() {
        let t = transpose(&arr1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), 2, 3);
        assert_eq!(t.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_matmul_compute_known_values() {
        // [1 2; 3 4] @ [5; 6] = [17; 39]
        let c = matmul_compute(&arr1(&[1.0, 2.0, 3.0, 4.0]), &arr1(&[5.0, 6.0]), 2, 2, 1);
        assert_eq!(c.to_vec(), vec![17.0, 39.0]);
    }

    #[test]
    #[should_panic(expected = "Matrix A size mismatch")]
    fn test_matmul_rejects_bad_shape() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], false);
        let b = Tensor::from_vec(vec![1.0, 2.0], false);
        let _ = matmul(&a, &b, 2, 2, 1);
    }
}
