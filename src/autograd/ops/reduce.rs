//! Reductions over matrix axes

use crate::autograd::{BackwardOp, Tensor};
use ndarray::{Array1, Axis};
use std::cell::RefCell;
use std::rc::Rc;

/// Mean over the rows of a rows × cols matrix, producing a length-`cols` vector
///
/// Used for node pooling: each column is averaged over all nodes.
pub fn mean_rows(a: &Tensor, rows: usize, cols: usize) -> Tensor {
    assert_eq!(a.len(), rows * cols, "mean_rows: size mismatch");
    assert!(rows > 0, "mean_rows: zero rows");

    let data = a
        .data()
        .view()
        .into_shape_with_order((rows, cols))
        .expect("flat buffer matches the declared matrix shape")
        .mean_axis(Axis(0))
        .expect("rows > 0");

    let mut result = Tensor::new(data, a.requires_grad());

    if result.requires_grad() {
        let backward_op = Rc::new(MeanRowsBackward {
            a: a.clone(),
            rows,
            cols,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct MeanRowsBackward {
    a: Tensor,
    rows: usize,
    cols: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for MeanRowsBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.a.requires_grad() {
                let inv = 1.0 / self.rows as f32;
                let grad_a: Array1<f32> =
                    (0..self.rows * self.cols).map(|i| grad[i % self.cols] * inv).collect();
                self.a.accumulate_grad(grad_a);
            }
        }
    }

    fn inputs(&self) -> Vec<&Tensor> {
        vec![&self.a]
    }
}
