//! Reproducible train/held-out partitioning.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Deterministic train/held-out split indices.
///
/// Shuffles `0..n_samples` with an explicitly seeded generator and cuts off
/// the first `round(n_samples * test_fraction)` indices as the held-out
/// partition. Identical seed and inputs produce the identical split on every
/// run and platform.
///
/// Returns `(train_indices, test_indices)`.
///
/// # Panics
///
/// Panics if `test_fraction` is outside `[0, 1)`.
pub fn train_test_split(
    n_samples: usize,
    test_fraction: f32,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    assert!(
        (0.0..1.0).contains(&test_fraction),
        "test_fraction must be in [0, 1), got {test_fraction}"
    );

    let mut idx: Vec<usize> = (0..n_samples).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let test_len = ((n_samples as f32) * test_fraction).round() as usize;
    let test_len = test_len.min(n_samples);
    let (test, train) = idx.split_at(test_len);
    (train.to_vec(), test.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_sizes_are_70_30() {
        let (train, test) = train_test_split(10, 0.3, 42);
        assert_eq!(train.len(), 7);
        assert_eq!(test.len(), 3);
    }

    #[test]
    fn partitions_are_disjoint_and_exhaustive() {
        let (mut train, mut test) = train_test_split(100, 0.3, 7);
        train.append(&mut test);
        train.sort_unstable();
        assert_eq!(train, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(train_test_split(50, 0.3, 42), train_test_split(50, 0.3, 42));
    }

    #[test]
    fn different_seed_different_split() {
        assert_ne!(train_test_split(50, 0.3, 42), train_test_split(50, 0.3, 43));
    }

    #[test]
    fn zero_fraction_keeps_everything_in_train() {
        let (train, test) = train_test_split(5, 0.0, 1);
        assert_eq!(train.len(), 5);
        assert!(test.is_empty());
    }
}
