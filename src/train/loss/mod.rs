//! Loss terms of the joint generator/classifier objective
//!
//! - [`BinaryCrossEntropy`] - BCE on probabilities, used for both graph
//!   reconstruction and classification
//! - [`kl_standard_normal`] - closed-form latent regularizer
//! - [`CompositeLoss`] - weighted total with a per-component breakdown

mod bce;
mod composite;
mod kl;
mod traits;

pub use bce::{binary_cross_entropy, BinaryCrossEntropy, BCE_EPSILON};
pub use composite::{CompositeLoss, LossBreakdown, LossInputs};
pub use kl::kl_standard_normal;
pub use traits::LossFn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_names() {
        assert_eq!(BinaryCrossEntropy.name(), "BCE");
    }
}
