//! Gradient checks through the inner-product decoder used by the generator

use super::test_utils::gradient_pair;
use crate::autograd::{matmul, sigmoid, transpose_t};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_inner_product_decoder_gradient(
        nodes in 2usize..6,
        latent in 1usize..4,
        z in prop::collection::vec(-1.5f32..1.5, 24),
    ) {
        // sigmoid(Z Zᵀ): Z reaches the output along two paths
        let z = &z[..nodes * latent];
        let (a, n) = gradient_pair(
            |t| {
                let zt = transpose_t(t, nodes, latent);
                sigmoid(&matmul(t, &zt, nodes, latent, nodes))
            },
            z,
        );
        for (i, (ga, gn)) in a.iter().zip(&n).enumerate() {
            prop_assert!((ga - gn).abs() < 2e-2, "mismatch at {}: {} vs {}", i, ga, gn);
        }
    }
}
