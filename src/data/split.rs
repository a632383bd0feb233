//! Stratified train/validation split and per-subset samplers

use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Disjoint train/validation index sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Split `0..labels.len()` preserving class proportions on both sides
///
/// The validation side receives `ceil(val_fraction * n)` indices. Each class
/// gets its proportional share, rounded by largest remainder so the totals
/// match exactly, and members are drawn after a per-class shuffle seeded
/// from `seed`. Returned index lists are sorted.
///
/// Fails instead of falling back to a random split when a class is too small
/// to appear on both sides.
pub fn stratified_split(labels: &[u8], val_fraction: f64, seed: u64) -> Result<Split> {
    if !(val_fraction > 0.0 && val_fraction < 1.0) {
        return Err(Error::Stratification(format!(
            "validation fraction {val_fraction} must lie in (0, 1)"
        )));
    }
    let n = labels.len();
    let n_val = (val_fraction * n as f64).ceil() as usize;
    if n_val == 0 || n_val >= n {
        return Err(Error::Stratification(format!(
            "{n} samples cannot give {n_val} validation and {} training samples",
            n.saturating_sub(n_val)
        )));
    }

    let mut classes: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (index, &label) in labels.iter().enumerate() {
        classes.entry(label).or_default().push(index);
    }
    if let Some((label, members)) = classes.iter().find(|(_, m)| m.len() < 2) {
        return Err(Error::Stratification(format!(
            "class {label} has only {} member(s), need at least 2",
            members.len()
        )));
    }

    let quotas = largest_remainder(
        &classes.values().map(Vec::len).collect::<Vec<_>>(),
        n,
        n_val,
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n - n_val);
    let mut validation = Vec::with_capacity(n_val);
    for ((label, members), quota) in classes.iter_mut().zip(quotas) {
        if quota == 0 || quota == members.len() {
            return Err(Error::Stratification(format!(
                "class {label} ({} members) would get {quota} validation samples",
                members.len()
            )));
        }
        members.shuffle(&mut rng);
        validation.extend_from_slice(&members[..quota]);
        train.extend_from_slice(&members[quota..]);
    }

    train.sort_unstable();
    validation.sort_unstable();
    Ok(Split { train, validation })
}

/// Apportion `total` slots across classes of the given sizes
fn largest_remainder(sizes: &[usize], n: usize, total: usize) -> Vec<usize> {
    let exact: Vec<f64> = sizes.iter().map(|&s| (total * s) as f64 / n as f64).collect();
    let mut quotas: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let assigned: usize = quotas.iter().sum();

    let mut order: Vec<usize> = (0..sizes.len()).collect();
    // Stable sort: ties go to the lower class label
    order.sort_by(|&a, &b| {
        let ra = exact[a] - quotas[a] as f64;
        let rb = exact[b] - quotas[b] as f64;
        rb.total_cmp(&ra)
    });
    for &class in order.iter().take(total - assigned) {
        quotas[class] += 1;
    }
    quotas
}

/// Draws indices from one subset only
#[derive(Debug, Clone)]
pub struct SubsetSampler {
    indices: Vec<usize>,
    shuffle: bool,
}

impl SubsetSampler {
    pub fn new(indices: Vec<usize>, shuffle: bool) -> Self {
        Self { indices, shuffle }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Visiting order for one epoch; the subset's own order unless shuffling
    pub fn epoch_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut order = self.indices.clone();
        if self.shuffle {
            order.shuffle(rng);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn positives(labels: &[u8], subset: &[usize]) -> usize {
        subset.iter().filter(|&&i| labels[i] == 1).count()
    }

    #[test]
    fn test_split_sizes() {
        let labels: Vec<u8> = (0..100).map(|i| u8::from(i % 4 == 0)).collect();
        let split = stratified_split(&labels, 0.2, 60).unwrap();
        assert_eq!(split.validation.len(), 20);
        assert_eq!(split.train.len(), 80);
        assert_eq!(positives(&labels, &split.validation), 5);
    }

    #[test]
    fn test_validation_size_rounds_up() {
        let labels: Vec<u8> = (0..11).map(|i| u8::from(i < 5)).collect();
        let split = stratified_split(&labels, 0.2, 1).unwrap();
        assert_eq!(split.validation.len(), 3);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let labels: Vec<u8> = (0..50).map(|i| u8::from(i % 3 == 0)).collect();
        let a = stratified_split(&labels, 0.2, 7).unwrap();
        let b = stratified_split(&labels, 0.2, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rare_class_fails() {
        let mut labels = vec![0u8; 20];
        labels[3] = 1;
        let err = stratified_split(&labels, 0.2, 0).unwrap_err();
        assert!(matches!(err, Error::Stratification(_)));
    }

    #[test]
    fn test_class_without_validation_share_fails() {
        // 2 positives in 40 samples at 0.2 -> 0.4 expected, rounds to 0
        let labels: Vec<u8> = (0..40).map(|i| u8::from(i < 2)).collect();
        assert!(stratified_split(&labels, 0.2, 0).is_err());
    }

    #[test]
    fn test_fraction_bounds() {
        let labels = vec![0, 1, 0, 1, 0, 1];
        assert!(stratified_split(&labels, 0.0, 0).is_err());
        assert!(stratified_split(&labels, 1.0, 0).is_err());
        assert!(stratified_split(&labels, f64::NAN, 0).is_err());
    }

    #[test]
    fn test_largest_remainder_totals() {
        assert_eq!(largest_remainder(&[7, 3], 10, 3), vec![2, 1]);
        assert_eq!(largest_remainder(&[5, 5], 10, 3), vec![2, 1]);
    }

    #[test]
    fn test_sampler_sequential_keeps_order() {
        let sampler = SubsetSampler::new(vec![4, 1, 9], false);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(sampler.epoch_order(&mut rng), vec![4, 1, 9]);
        assert_eq!(sampler.epoch_order(&mut rng), vec![4, 1, 9]);
    }

    #[test]
    fn test_sampler_shuffle_is_permutation() {
        let indices: Vec<usize> = (0..30).map(|i| i * 2).collect();
        let sampler = SubsetSampler::new(indices.clone(), true);
        let mut rng = StdRng::seed_from_u64(3);
        let mut order = sampler.epoch_order(&mut rng);
        order.sort_unstable();
        assert_eq!(order, indices);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_split_is_stratified_partition(
            n_pos in 10usize..60,
            n_neg in 10usize..60,
            fraction in 0.1f64..0.5,
            seed in any::<u64>(),
        ) {
            let mut labels = vec![1u8; n_pos];
            labels.extend(std::iter::repeat_n(0u8, n_neg));
            labels.shuffle(&mut StdRng::seed_from_u64(seed));
            let n = labels.len();

            let split = stratified_split(&labels, fraction, seed).unwrap();

            let mut all: Vec<usize> = split.train.iter().chain(&split.validation).copied().collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..n).collect::<Vec<_>>());

            let p = n_pos as f64 / n as f64;
            for subset in [&split.train, &split.validation] {
                let expected = p * subset.len() as f64;
                let got = positives(&labels, subset) as f64;
                prop_assert!((got - expected).abs() <= 1.0, "{} vs {}", got, expected);
            }
        }

        #[test]
        fn prop_shuffled_sampler_never_leaves_subset(
            seed in any::<u64>(),
            subset in proptest::collection::btree_set(0usize..500, 1..50),
        ) {
            let indices: Vec<usize> = subset.into_iter().collect();
            let sampler = SubsetSampler::new(indices.clone(), true);
            let mut rng = StdRng::seed_from_u64(seed);
            for i in sampler.epoch_order(&mut rng) {
                prop_assert!(indices.contains(&i));
            }
        }
    }
}
