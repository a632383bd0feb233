//! Closed-form latent regularizer against a standard normal prior

use crate::autograd::BackwardOp;
use crate::Tensor;
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

/// `mean_rows(sum_cols(1 + 2·ls - m² - e^{2·ls}))` over a `rows × cols` latent
///
/// This is the ELBO's regularization term: it equals `-2·KL(q ‖ N(0, I))`
/// per row, so it is never positive and reaches zero only at `m = 0, ls = 0`.
/// Gradients: `∂/∂m = -2m / rows`, `∂/∂ls = (2 - 2e^{2·ls}) / rows`.
pub fn kl_standard_normal(mean: &Tensor, log_std: &Tensor, rows: usize, cols: usize) -> Tensor {
    assert_eq!(mean.len(), rows * cols, "latent mean must be rows × cols");
    assert_eq!(log_std.len(), rows * cols, "latent log-std must be rows × cols");
    assert!(rows > 0, "latent has no rows");

    let inv_rows = 1.0 / rows as f32;
    let total: f32 = mean
        .data()
        .iter()
        .zip(log_std.data().iter())
        .map(|(&m, &ls)| 1.0 + 2.0 * ls - m * m - (2.0 * ls).exp())
        .sum::<f32>()
        * inv_rows;

    let requires_grad = mean.requires_grad() || log_std.requires_grad();
    let mut result = Tensor::new(Array1::from(vec![total]), requires_grad);

    if result.requires_grad() {
        result.set_backward_op(Rc::new(KlBackward {
            mean: mean.clone(),
            log_std: log_std.clone(),
            inv_rows,
            result_grad: result.grad_cell(),
        }));
    }

    result
}

struct KlBackward {
    mean: Tensor,
    log_std: Tensor,
    inv_rows: f32,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for KlBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            let g = grad[0] * self.inv_rows;
            if self.mean.requires_grad() {
                self.mean.accumulate_grad(self.mean.data().mapv(|m| -2.0 * m * g));
            }
            if self.log_std.requires_grad() {
                self.log_std
                    .accumulate_grad(self.log_std.data().mapv(|ls| (2.0 - 2.0 * (2.0 * ls).exp()) * g));
            }
        }
    }

    fn inputs(&self) -> Vec<&Tensor> {
        vec![&self.mean, &self.log_std]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_at_prior() {
        let m = Tensor::zeros(6, false);
        let ls = Tensor::zeros(6, false);
        assert_abs_diff_eq!(kl_standard_normal(&m, &ls, 2, 3).item(), 0.0);
    }

    #[test]
    fn test_sums_columns_and_averages_rows() {
        // one row with m = 1: each column contributes -1
        let m = Tensor::from_vec(vec![1.0, 1.0, 0.0, 0.0], false);
        let ls = Tensor::zeros(4, false);
        assert_abs_diff_eq!(kl_standard_normal(&m, &ls, 2, 2).item(), -1.0);
    }

    #[test]
    fn test_never_positive() {
        let m = Tensor::from_vec(vec![0.3, -0.7, 0.0, 2.0], false);
        let ls = Tensor::from_vec(vec![-1.0, 0.5, 0.1, -0.2], false);
        assert!(kl_standard_normal(&m, &ls, 2, 2).item() <= 0.0);
    }

    #[test]
    fn test_gradients() {
        let m = Tensor::from_vec(vec![0.5, -1.0], true);
        let ls = Tensor::from_vec(vec![0.0, 0.25], true);
        let mut out = kl_standard_normal(&m, &ls, 1, 2);
        backward(&mut out, None);

        let gm = m.grad().unwrap();
        assert_abs_diff_eq!(gm[0], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(gm[1], 2.0, epsilon = 1e-6);
        let gls = ls.grad().unwrap();
        assert_abs_diff_eq!(gls[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(gls[1], 2.0 - 2.0 * 0.5f32.exp(), epsilon = 1e-5);
    }
}
