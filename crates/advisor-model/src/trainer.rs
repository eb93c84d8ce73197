//! # Classifier Trainer
//!
//! `train(X, y, hyperparameters)`: governance gate first, then shape checks,
//! then boosting. The gate inspects the column names carried by the
//! [`FeatureMatrix`]; anything other than the four allow-listed features in
//! schema order stops training before any fitting work begins.

use std::collections::BTreeSet;

use advisor_codec::FeatureMatrix;
use advisor_core::schema::enforce_schema_order;
use advisor_core::FeatureSchema;

use crate::boosting::GradientBoostedTrees;
use crate::error::TrainError;
use crate::hyperparams::Hyperparameters;

/// Fit a tree ensemble over an encoded matrix and class indices.
///
/// The class count is `max(y) + 1`, so class indices must come from the
/// target codec that will decode the predictions.
pub fn train(
    x: &FeatureMatrix,
    y: &[usize],
    hyperparameters: &Hyperparameters,
) -> Result<GradientBoostedTrees, TrainError> {
    enforce_schema_order(&x.feature_names)?;

    if x.is_empty() {
        return Err(TrainError::EmptyTrainingSet);
    }
    if x.len() != y.len() {
        return Err(TrainError::LengthMismatch {
            rows: x.len(),
            labels: y.len(),
        });
    }
    if let Some(row) = x.ragged_row() {
        return Err(TrainError::RaggedRow {
            row,
            expected: x.feature_names.len(),
            found: x.rows[row].len(),
        });
    }
    for (row, values) in x.rows.iter().enumerate() {
        if let Some(f) = values.iter().position(|v| !v.is_finite()) {
            return Err(TrainError::NonFiniteFeature {
                row,
                feature: x.feature_names[f].clone(),
            });
        }
    }
    let distinct: BTreeSet<usize> = y.iter().copied().collect();
    if distinct.len() < 2 {
        return Err(TrainError::TooFewClasses(distinct.len()));
    }
    let n_classes = distinct.iter().next_back().map_or(0, |m| m + 1);

    tracing::info!(
        rows = x.len(),
        classes = n_classes,
        rounds = hyperparameters.n_estimators,
        max_depth = hyperparameters.max_depth,
        learning_rate = hyperparameters.learning_rate,
        "training gradient-boosted tree ensemble"
    );
    let model = GradientBoostedTrees::fit(
        FeatureSchema::current(),
        &x.rows,
        y,
        n_classes,
        hyperparameters,
    );
    tracing::info!(rounds = model.n_rounds(), "training complete");
    Ok(model)
}
