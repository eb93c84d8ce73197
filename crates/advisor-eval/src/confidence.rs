//! # Confidence Distribution
//!
//! Confidence is the largest class probability of a prediction. Bins use the
//! fixed edges `[0.0, 0.5, 0.7, 0.8, 0.9, 1.0]`; every bin is half-open
//! `[lo, hi)` except the last, which is closed `[0.9, 1.0]`. Together they
//! partition `[0, 1]`.
//!
//! Bins without samples keep a count of zero and carry no accuracy.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Confidence bin edges.
pub const CONFIDENCE_BIN_EDGES: [f64; 6] = [0.0, 0.5, 0.7, 0.8, 0.9, 1.0];

const BIN_COUNT: usize = CONFIDENCE_BIN_EDGES.len() - 1;

/// One confidence bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBin {
    /// Display label, e.g. `"0.7-0.8"`.
    pub range: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Share of all samples, 0–100.
    pub percentage: f64,
    /// Accuracy within the bin; absent when the bin is empty.
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceMetrics {
    pub mean_confidence: f64,
    pub median_confidence: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Population standard deviation.
    pub std_confidence: f64,
    pub bins: Vec<ConfidenceBin>,
}

/// Bin holding `confidence`, or `None` outside `[0, 1]` (including NaN).
pub fn bin_index(confidence: f64) -> Option<usize> {
    let last = BIN_COUNT - 1;
    if confidence >= CONFIDENCE_BIN_EDGES[last] && confidence <= CONFIDENCE_BIN_EDGES[BIN_COUNT] {
        return Some(last);
    }
    (0..last).find(|&i| {
        confidence >= CONFIDENCE_BIN_EDGES[i] && confidence < CONFIDENCE_BIN_EDGES[i + 1]
    })
}

/// Summary statistics and bin accuracy of per-row confidences.
///
/// `correct[i]` says whether row `i` was predicted correctly.
pub fn confidence_metrics(
    confidences: &[f64],
    correct: &[bool],
) -> Result<ConfidenceMetrics, EvalError> {
    if confidences.is_empty() {
        return Err(EvalError::EmptyTestSet);
    }
    if confidences.len() != correct.len() {
        return Err(EvalError::LengthMismatch {
            rows: confidences.len(),
            labels: correct.len(),
        });
    }
    let n = confidences.len() as f64;
    let mean = confidences.iter().sum::<f64>() / n;
    let variance = confidences.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    let mut sorted = confidences.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let mut counts = [0usize; BIN_COUNT];
    let mut hits = [0usize; BIN_COUNT];
    for (&c, &ok) in confidences.iter().zip(correct) {
        if let Some(b) = bin_index(c) {
            counts[b] += 1;
            if ok {
                hits[b] += 1;
            }
        }
    }
    let bins = (0..BIN_COUNT)
        .map(|b| {
            let (lower, upper) = (CONFIDENCE_BIN_EDGES[b], CONFIDENCE_BIN_EDGES[b + 1]);
            if counts[b] == 0 {
                tracing::debug!(lower, upper, "confidence bin is empty");
            }
            ConfidenceBin {
                range: format!("{lower:.1}-{upper:.1}"),
                lower,
                upper,
                count: counts[b],
                percentage: counts[b] as f64 / n * 100.0,
                accuracy: (counts[b] > 0).then(|| hits[b] as f64 / counts[b] as f64),
            }
        })
        .collect();

    Ok(ConfidenceMetrics {
        mean_confidence: mean,
        median_confidence: median,
        min_confidence: sorted[0],
        max_confidence: sorted[sorted.len() - 1],
        std_confidence: variance.sqrt(),
        bins,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every confidence in [0, 1] lands in exactly one bin.
        #[test]
        fn bins_partition_unit_interval(c in 0.0f64..=1.0) {
            let members: Vec<usize> = (0..BIN_COUNT)
                .filter(|&i| {
                    let (lo, hi) = (CONFIDENCE_BIN_EDGES[i], CONFIDENCE_BIN_EDGES[i + 1]);
                    if i == BIN_COUNT - 1 { c >= lo && c <= hi } else { c >= lo && c < hi }
                })
                .collect();
            prop_assert_eq!(members.len(), 1);
            prop_assert_eq!(bin_index(c), Some(members[0]));
        }

        /// Bin counts always add up to the sample count.
        #[test]
        fn bin_counts_cover_all_samples(conf in prop::collection::vec(0.0f64..=1.0, 1..100)) {
            let correct = vec![true; conf.len()];
            let m = confidence_metrics(&conf, &correct).unwrap();
            prop_assert_eq!(m.bins.iter().map(|b| b.count).sum::<usize>(), conf.len());
        }
    }
}
