//! Optimizer trait

use crate::Tensor;

/// Trait for optimization algorithms
///
/// Parameters are borrowed from a model for the duration of a call, and the
/// optimizer keeps per-parameter state indexed by position, so callers must
/// pass parameters in the same order on every step.
pub trait Optimizer {
    /// Perform one update on the referenced parameters using their gradients
    fn step_refs(&mut self, params: &mut [&mut Tensor]);

    /// Zero gradients on referenced parameters
    fn zero_grad_refs(&mut self, params: &mut [&mut Tensor]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    /// Plain gradient descent, enough to exercise the default methods
    struct Descent {
        learning_rate: f32,
    }

    impl Optimizer for Descent {
        fn step_refs(&mut self, params: &mut [&mut Tensor]) {
            for param in params.iter_mut() {
                if let Some(grad) = param.grad() {
                    let update = grad * self.learning_rate;
                    *param.data_mut() -= &update;
                }
            }
        }

        fn lr(&self) -> f32 {
            self.learning_rate
        }

        fn set_lr(&mut self, lr: f32) {
            self.learning_rate = lr;
        }
    }

    #[test]
    fn test_zero_grad_refs_clears_all() {
        let mut opt = Descent { learning_rate: 0.1 };
        let mut a = Tensor::from_vec(vec![1.0], true);
        let mut b = Tensor::from_vec(vec![2.0], true);
        a.set_grad(arr1(&[1.0]));
        b.set_grad(arr1(&[1.0]));

        opt.zero_grad_refs(&mut [&mut a, &mut b]);
        assert!(a.grad().is_none());
        assert!(b.grad().is_none());
    }

    #[test]
    fn test_step_refs_skips_params_without_grad() {
        let mut opt = Descent { learning_rate: 0.5 };
        let mut a = Tensor::from_vec(vec![1.0, 2.0], true);
        let mut b = Tensor::from_vec(vec![3.0], true);
        a.set_grad(arr1(&[2.0, 2.0]));

        opt.step_refs(&mut [&mut a, &mut b]);
        assert_eq!(a.data().to_vec(), vec![0.0, 1.0]);
        assert_eq!(b.data().to_vec(), vec![3.0]);
    }

    #[test]
    fn test_set_lr() {
        let mut opt = Descent { learning_rate: 0.5 };
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }
}
