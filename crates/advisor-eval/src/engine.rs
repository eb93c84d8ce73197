//! # Evaluation Engine
//!
//! `evaluate(model, X_test, y_test)` runs inference once per row and derives
//! every metric group from that single pass.

use serde::{Deserialize, Serialize};

use advisor_codec::FeatureMatrix;
use advisor_model::{argmax, Classifier};

use crate::classification::{classification_metrics, ClassificationMetrics};
use crate::confidence::{confidence_metrics, ConfidenceMetrics};
use crate::error::EvalError;
use crate::uncertainty::{uncertainty_metrics, UncertaintyMetrics};

/// Per-row inference results over a held-out set.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions {
    pub probabilities: Vec<Vec<f64>>,
    pub predicted: Vec<usize>,
}

impl Predictions {
    /// Max-probability confidence per row.
    pub fn confidences(&self) -> Vec<f64> {
        self.probabilities
            .iter()
            .map(|p| p.iter().cloned().fold(0.0, f64::max))
            .collect()
    }
}

/// Every metric the Evaluation Engine produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub test_samples: usize,
    pub classification: ClassificationMetrics,
    pub confidence: ConfidenceMetrics,
    pub uncertainty: UncertaintyMetrics,
}

/// Run the model over every row. Rows are independent of one another.
pub fn predict_rows(model: &dyn Classifier, x: &FeatureMatrix) -> Result<Predictions, EvalError> {
    let probabilities = x
        .rows
        .iter()
        .enumerate()
        .map(|(row, features)| {
            model
                .predict_proba(features)
                .map_err(|source| EvalError::Model { row, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let predicted = probabilities.iter().map(|p| argmax(p)).collect();
    Ok(Predictions {
        probabilities,
        predicted,
    })
}

/// Evaluate `model` on a held-out set. `class_labels` is the target codec's
/// class list and fixes the order of per-class metrics and the confusion
/// matrix.
pub fn evaluate(
    model: &dyn Classifier,
    x_test: &FeatureMatrix,
    y_test: &[usize],
    class_labels: &[String],
) -> Result<Metrics, EvalError> {
    if x_test.is_empty() {
        return Err(EvalError::EmptyTestSet);
    }
    if x_test.len() != y_test.len() {
        return Err(EvalError::LengthMismatch {
            rows: x_test.len(),
            labels: y_test.len(),
        });
    }
    let predictions = predict_rows(model, x_test)?;
    let classification = classification_metrics(
        y_test,
        &predictions.predicted,
        &predictions.probabilities,
        class_labels,
    )?;
    let correct: Vec<bool> = predictions
        .predicted
        .iter()
        .zip(y_test)
        .map(|(p, y)| p == y)
        .collect();
    let confidence = confidence_metrics(&predictions.confidences(), &correct)?;
    let uncertainty = uncertainty_metrics(&predictions.probabilities)?;

    tracing::info!(
        test_samples = y_test.len(),
        accuracy = classification.accuracy,
        log_loss = classification.log_loss,
        mean_confidence = confidence.mean_confidence,
        "evaluation complete"
    );
    Ok(Metrics {
        test_samples: y_test.len(),
        classification,
        confidence,
        uncertainty,
    })
}
