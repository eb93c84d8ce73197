//! # Classifier Seam
//!
//! Everything downstream of training talks to the model through
//! [`Classifier`]. A backend only has to produce a probability vector per
//! row, a global importance vector, and an honest [`ModelDescriptor`].

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Self-description a backend reports for the Metadata Record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Human-readable model family, e.g. "Gradient Boosted Trees Classifier".
    pub model_type: String,
    /// Architecture tag, e.g. "Classical ML (tree-based gradient boosting)".
    pub model_architecture: String,
    /// True only for classical (non-neural, non-generative) algorithms.
    pub is_classical: bool,
}

/// A fitted multi-class classifier. Read-only after construction.
pub trait Classifier: Send + Sync {
    /// Number of target classes, in codec class order.
    fn n_classes(&self) -> usize;

    /// Width of the feature vector the model was fitted on.
    fn n_features(&self) -> usize;

    /// Class probabilities for one encoded feature vector. Sums to 1.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Most probable class index. Ties resolve to the lowest index.
    fn predict(&self, features: &[f64]) -> Result<usize, ModelError> {
        Ok(argmax(&self.predict_proba(features)?))
    }

    /// Global feature importances in schema order, summing to 1 (or all 0
    /// for a model without splits).
    fn feature_importances(&self) -> Vec<f64>;

    fn descriptor(&self) -> ModelDescriptor;
}

/// Index of the largest value; first index wins ties. 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
