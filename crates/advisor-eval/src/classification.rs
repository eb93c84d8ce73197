//! # Classification Metrics
//!
//! Per-class precision, recall and F1 follow the usual definitions. A ratio
//! whose denominator is zero (no predictions of a class, or no support) is
//! reported as 0 rather than NaN.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Probabilities below this are clipped before taking the log.
const LOG_LOSS_CLIP: f64 = 1e-15;

/// Metrics for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Macro or support-weighted average across classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
    /// `confusion_matrix[actual][predicted]`.
    pub confusion_matrix: Vec<Vec<usize>>,
    /// Multi-class cross-entropy; lower means better-calibrated confidence.
    pub log_loss: f64,
}

/// Square confusion matrix over `n_classes`.
pub fn confusion_matrix(
    actual: &[usize],
    predicted: &[usize],
    n_classes: usize,
) -> Result<Vec<Vec<usize>>, EvalError> {
    let mut matrix = vec![vec![0usize; n_classes]; n_classes];
    for (row, (&a, &p)) in actual.iter().zip(predicted).enumerate() {
        for index in [a, p] {
            if index >= n_classes {
                return Err(EvalError::ClassOutOfRange {
                    row,
                    index,
                    n_classes,
                });
            }
        }
        matrix[a][p] += 1;
    }
    Ok(matrix)
}

/// Mean negative log-probability of the true class, clipped at 1e-15.
pub fn log_loss(actual: &[usize], probabilities: &[Vec<f64>]) -> Result<f64, EvalError> {
    if actual.is_empty() {
        return Err(EvalError::EmptyTestSet);
    }
    let mut total = 0.0;
    for (row, (&y, p)) in actual.iter().zip(probabilities).enumerate() {
        let Some(&p_true) = p.get(y) else {
            return Err(EvalError::ClassOutOfRange {
                row,
                index: y,
                n_classes: p.len(),
            });
        };
        total -= p_true.clamp(LOG_LOSS_CLIP, 1.0 - LOG_LOSS_CLIP).ln();
    }
    Ok(total / actual.len() as f64)
}

/// Full classification report over a held-out set.
pub fn classification_metrics(
    actual: &[usize],
    predicted: &[usize],
    probabilities: &[Vec<f64>],
    class_labels: &[String],
) -> Result<ClassificationMetrics, EvalError> {
    if actual.is_empty() {
        return Err(EvalError::EmptyTestSet);
    }
    let n_classes = class_labels.len();
    let matrix = confusion_matrix(actual, predicted, n_classes)?;
    let total = actual.len();
    let correct: usize = (0..n_classes).map(|c| matrix[c][c]).sum();

    let per_class: Vec<ClassMetrics> = class_labels
        .iter()
        .enumerate()
        .map(|(c, label)| {
            let tp = matrix[c][c] as f64;
            let support: usize = matrix[c].iter().sum();
            let predicted_c: usize = matrix.iter().map(|row| row[c]).sum();
            let precision = ratio(tp, predicted_c as f64);
            let recall = ratio(tp, support as f64);
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1_score: ratio(2.0 * precision * recall, precision + recall),
                support,
            }
        })
        .collect();

    Ok(ClassificationMetrics {
        accuracy: correct as f64 / total as f64,
        macro_avg: average(&per_class, |_| 1.0),
        weighted_avg: average(&per_class, |m| m.support as f64),
        per_class,
        confusion_matrix: matrix,
        log_loss: log_loss(actual, probabilities)?,
    })
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

fn average(per_class: &[ClassMetrics], weight: impl Fn(&ClassMetrics) -> f64) -> AveragedMetrics {
    let total_weight: f64 = per_class.iter().map(&weight).sum();
    let weighted = |f: fn(&ClassMetrics) -> f64| {
        ratio(
            per_class.iter().map(|m| weight(m) * f(m)).sum(),
            total_weight,
        )
    };
    AveragedMetrics {
        precision: weighted(|m| m.precision),
        recall: weighted(|m| m.recall),
        f1_score: weighted(|m| m.f1_score),
        support: per_class.iter().map(|m| m.support).sum(),
    }
}
