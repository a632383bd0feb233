//! Binary cross-entropy on probabilities
//!
//! ```text
//! p̂_i = clamp(p_i, ε, 1 - ε)
//! L   = -mean(t_i ln p̂_i + (1 - t_i) ln(1 - p̂_i))
//! ∂L/∂p_i = (p̂_i - t_i) / (p̂_i (1 - p̂_i) N)
//! ```
//!
//! The clamp keeps both the loss and its gradient finite when a sigmoid
//! saturates to exactly 0 or 1.

use crate::autograd::BackwardOp;
use crate::Tensor;
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

use super::LossFn;

/// Probability clamp applied before taking logarithms
pub const BCE_EPSILON: f32 = 1e-7;

/// Mean binary cross-entropy between probabilities and 0/1 targets
pub struct BinaryCrossEntropy;

impl LossFn for BinaryCrossEntropy {
    fn forward(&self, predictions: &Tensor, targets: &Tensor) -> Tensor {
        assert_eq!(
            predictions.len(),
            targets.len(),
            "Predictions and targets must have same length"
        );
        assert!(!predictions.is_empty(), "BCE of an empty tensor");

        let n = predictions.len() as f32;
        let clamped = predictions.data().mapv(|p| p.clamp(BCE_EPSILON, 1.0 - BCE_EPSILON));

        let total: f32 = clamped
            .iter()
            .zip(targets.data().iter())
            .map(|(&p, &t)| -(t * p.ln() + (1.0 - t) * (1.0 - p).ln()))
            .sum::<f32>()
            / n;

        let mut loss = Tensor::new(Array1::from(vec![total]), predictions.requires_grad());

        if loss.requires_grad() {
            let local = clamped
                .iter()
                .zip(targets.data().iter())
                .map(|(&p, &t)| (p - t) / (p * (1.0 - p) * n))
                .collect();
            loss.set_backward_op(Rc::new(BceBackward {
                predictions: predictions.clone(),
                local,
                result_grad: loss.grad_cell(),
            }));
        }

        loss
    }

    fn name(&self) -> &str {
        "BCE"
    }
}

/// Shorthand for [`BinaryCrossEntropy::forward`]
pub fn binary_cross_entropy(predictions: &Tensor, targets: &Tensor) -> Tensor {
    BinaryCrossEntropy.forward(predictions, targets)
}

struct BceBackward {
    predictions: Tensor,
    local: Array1<f32>,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for BceBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            self.predictions.accumulate_grad(&self.local * grad[0]);
        }
    }

    fn inputs(&self) -> Vec<&Tensor> {
        vec![&self.predictions]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_known_value() {
        let p = Tensor::from_vec(vec![0.8, 0.3], false);
        let t = Tensor::from_vec(vec![1.0, 0.0], false);
        let loss = binary_cross_entropy(&p, &t);
        let expected = -(0.8f32.ln() + 0.7f32.ln()) / 2.0;
        assert_abs_diff_eq!(loss.item(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_perfect_prediction_near_zero() {
        let p = Tensor::from_vec(vec![1.0, 0.0, 1.0], false);
        let t = Tensor::from_vec(vec![1.0, 0.0, 1.0], false);
        assert!(binary_cross_entropy(&p, &t).item() < 1e-5);
    }

    #[test]
    fn test_saturated_prediction_stays_finite() {
        let p = Tensor::from_vec(vec![0.0, 1.0], true);
        let t = Tensor::from_vec(vec![1.0, 0.0], false);
        let mut loss = binary_cross_entropy(&p, &t);
        assert!(loss.item().is_finite());
        backward(&mut loss, None);
        assert!(p.grad().unwrap().iter().all(|g| g.is_finite()));
    }

    #[test]
    fn test_upstream_gradient_is_applied() {
        let p = Tensor::from_vec(vec![0.25], true);
        let t = Tensor::from_vec(vec![1.0], false);
        let mut loss = binary_cross_entropy(&p, &t);
        backward(&mut loss, Some(Array1::from(vec![10.0])));
        // d/dp(-ln p) = -1/p = -4, times 10
        assert_abs_diff_eq!(p.grad().unwrap()[0], -40.0, epsilon = 1e-3);
    }

    proptest! {
        #[test]
        fn prop_gradient_matches_finite_difference(
            p in proptest::collection::vec(0.05f32..0.95, 1..8),
            seed in any::<u64>(),
        ) {
            let targets: Vec<f32> = p
                .iter()
                .enumerate()
                .map(|(i, _)| ((seed >> (i % 64)) & 1) as f32)
                .collect();
            let t = Tensor::from_vec(targets, false);
            let x = Tensor::from_vec(p.clone(), true);
            let mut loss = binary_cross_entropy(&x, &t);
            backward(&mut loss, None);
            let analytic = x.grad().unwrap();

            let h = 1e-3;
            for i in 0..p.len() {
                let mut plus = p.clone();
                plus[i] += h;
                let mut minus = p.clone();
                minus[i] -= h;
                let fp = binary_cross_entropy(&Tensor::from_vec(plus, false), &t).item();
                let fm = binary_cross_entropy(&Tensor::from_vec(minus, false), &t).item();
                let numeric = (fp - fm) / (2.0 * h);
                prop_assert!((analytic[i] - numeric).abs() < 2e-2 * numeric.abs().max(1.0));
            }
        }
    }
}
