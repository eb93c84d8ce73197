//! # Stratified Train/Test Split
//!
//! Rows are grouped by class (ascending class index). Each group is shuffled
//! with one `StdRng` seeded from the split seed, and the first
//! `round(test_fraction · n_c)` rows of the group are held out. A class with
//! two or more rows always contributes at least one test row and keeps at
//! least one training row. Both index lists are returned sorted.
//!
//! Same labels in the same order and the same seed give the same partition.
//! `StdRng`'s stream is only stable within one `rand` major version, so the
//! partition is reproducible per build, not across `rand` upgrades.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// Row indices of each side of the split, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partition `labels` into train and test indices, stratified by class.
pub fn stratified_split(
    labels: &[usize],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, SplitError> {
    if labels.is_empty() {
        return Err(SplitError::Empty);
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();
    for rows in by_class.values_mut() {
        rows.shuffle(&mut rng);
        let n_test = holdout_count(rows.len(), test_fraction);
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }
    if test.is_empty() {
        return Err(SplitError::EmptyTestSet);
    }
    train.sort_unstable();
    test.sort_unstable();

    tracing::debug!(
        train = train.len(),
        test = test.len(),
        classes = by_class.len(),
        seed,
        "stratified split"
    );
    Ok(SplitIndices { train, test })
}

fn holdout_count(n: usize, test_fraction: f64) -> usize {
    if n < 2 {
        return 0;
    }
    let n_test = (test_fraction * n as f64).round() as usize;
    n_test.clamp(1, n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighty_twenty_per_class() {
        let labels: Vec<usize> = (0..100).map(|i| i % 2).collect();
        let split = stratified_split(&labels, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
        let test_zero = split.test.iter().filter(|&&i| labels[i] == 0).count();
        assert_eq!(test_zero, 10);
    }

    #[test]
    fn small_classes_still_get_a_test_row() {
        let labels = vec![0, 0, 1, 1, 1, 2];
        let split = stratified_split(&labels, 0.2, 42).unwrap();
        let test_classes: Vec<usize> = split.test.iter().map(|&i| labels[i]).collect();
        assert!(test_classes.contains(&0));
        assert!(test_classes.contains(&1));
        // A lone row always trains.
        assert!(split.train.contains(&5));
    }

    #[test]
    fn different_seed_different_partition() {
        let labels: Vec<usize> = (0..200).map(|i| i % 3).collect();
        let a = stratified_split(&labels, 0.2, 42).unwrap();
        let b = stratified_split(&labels, 0.2, 7).unwrap();
        assert_ne!(a.test, b.test);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(stratified_split(&[], 0.2, 42), Err(SplitError::Empty));
        assert_eq!(
            stratified_split(&[0, 1], 1.0, 42),
            Err(SplitError::InvalidFraction(1.0))
        );
        assert_eq!(stratified_split(&[0, 1, 2], 0.2, 42), Err(SplitError::EmptyTestSet));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same rows and same seed always give the same partition.
        #[test]
        fn split_is_deterministic(
            labels in prop::collection::vec(0usize..4, 10..200),
            seed in any::<u64>()
        ) {
            let a = stratified_split(&labels, 0.2, seed);
            let b = stratified_split(&labels, 0.2, seed);
            prop_assert_eq!(a, b);
        }

        /// Train and test are disjoint and together cover every row.
        #[test]
        fn split_is_a_partition(labels in prop::collection::vec(0usize..4, 10..200)) {
            if let Ok(split) = stratified_split(&labels, 0.2, 42) {
                let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
                all.sort_unstable();
                prop_assert_eq!(all, (0..labels.len()).collect::<Vec<_>>());
            }
        }
    }
}
