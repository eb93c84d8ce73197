//! # Gradient-Boosted Tree Ensemble
//!
//! Multi-class softmax boosting. Every round fits one regression tree per
//! class to the softmax cross-entropy gradients of the current margins:
//!
//! ```text
//! p   = softmax(margin)
//! g_c = p_c - [y = c]
//! h_c = p_c · (1 - p_c)
//! ```
//!
//! Feature importance is the average split gain per feature across all
//! trees, normalized to sum to 1.

use serde::{Deserialize, Serialize};

use advisor_core::{ArtifactKind, ArtifactLoadError, FeatureSchema};

use crate::classifier::{Classifier, ModelDescriptor};
use crate::error::ModelError;
use crate::hyperparams::Hyperparameters;
use crate::tree::{fit_tree, GrowthParams, TreeNode};

/// Lower bound on a per-row hessian so a saturated row still counts.
const MIN_HESSIAN: f64 = 1e-16;

/// Initial margin for every class before the first round.
const BASE_MARGIN: f64 = 0.5;

/// The Trained Model Artifact: a fitted softmax tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    schema: FeatureSchema,
    hyperparameters: Hyperparameters,
    n_classes: usize,
    base_margin: f64,
    /// `rounds[r][c]` is the tree for class `c` in round `r`.
    rounds: Vec<Vec<TreeNode>>,
    feature_importances: Vec<f64>,
}

impl GradientBoostedTrees {
    /// Boost an ensemble over `rows` and class indices `labels`.
    ///
    /// The caller has already checked shapes, finiteness, and the feature
    /// allow-list (see [`crate::train`]).
    pub(crate) fn fit(
        schema: FeatureSchema,
        rows: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        hyperparameters: &Hyperparameters,
    ) -> Self {
        let n = rows.len();
        let n_features = schema.features.len();
        let growth = GrowthParams {
            max_depth: hyperparameters.max_depth,
            reg_lambda: hyperparameters.reg_lambda,
            min_child_weight: hyperparameters.min_child_weight,
            learning_rate: hyperparameters.learning_rate,
        };

        let mut margins = vec![vec![BASE_MARGIN; n_classes]; n];
        let mut rounds = Vec::with_capacity(hyperparameters.n_estimators);
        let mut grad = vec![0.0; n];
        let mut hess = vec![0.0; n];

        for round in 0..hyperparameters.n_estimators {
            let probs: Vec<Vec<f64>> = margins.iter().map(|m| softmax(m)).collect();
            let mut trees = Vec::with_capacity(n_classes);
            for class in 0..n_classes {
                for i in 0..n {
                    let p = probs[i][class];
                    let y = if labels[i] == class { 1.0 } else { 0.0 };
                    grad[i] = p - y;
                    hess[i] = (p * (1.0 - p)).max(MIN_HESSIAN);
                }
                trees.push(fit_tree(rows, &grad, &hess, &growth));
            }
            for (margin, row) in margins.iter_mut().zip(rows) {
                for (class, tree) in trees.iter().enumerate() {
                    margin[class] += tree.evaluate(row);
                }
            }
            rounds.push(trees);

            if (round + 1) % 10 == 0 {
                tracing::debug!(
                    round = round + 1,
                    train_mlogloss = mean_log_loss(&margins, labels),
                    "boosting progress"
                );
            }
        }

        let feature_importances = average_gain_importance(&rounds, n_features);
        Self {
            schema,
            hyperparameters: hyperparameters.clone(),
            n_classes,
            base_margin: BASE_MARGIN,
            rounds,
            feature_importances,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    /// Number of boosting rounds actually stored.
    pub fn n_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Raw class margins for one row.
    fn margins(&self, x: &[f64]) -> Vec<f64> {
        let mut margin = vec![self.base_margin; self.n_classes];
        for trees in &self.rounds {
            for (class, tree) in trees.iter().enumerate() {
                margin[class] += tree.evaluate(x);
            }
        }
        margin
    }

    /// Structural checks for a model read back from disk.
    pub fn validate_loaded(&self, path: &str) -> Result<(), ArtifactLoadError> {
        self.schema.ensure_compatible(ArtifactKind::Model, path)?;
        let corrupt = |reason: String| ArtifactLoadError::new(ArtifactKind::Model, path, reason);
        if self.n_classes < 2 {
            return Err(corrupt(format!("model has {} class(es)", self.n_classes)));
        }
        let width = self.n_features();
        if self.feature_importances.len() != width {
            return Err(corrupt(format!(
                "{} feature importances for {} features",
                self.feature_importances.len(),
                width
            )));
        }
        for (r, trees) in self.rounds.iter().enumerate() {
            if trees.len() != self.n_classes {
                return Err(corrupt(format!(
                    "round {r} has {} trees, expected {}",
                    trees.len(),
                    self.n_classes
                )));
            }
            if trees
                .iter()
                .any(|t| t.max_feature().is_some_and(|f| f >= width))
            {
                return Err(corrupt(format!("round {r} splits on a feature outside the schema")));
            }
        }
        Ok(())
    }
}

impl Classifier for GradientBoostedTrees {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn n_features(&self) -> usize {
        self.schema.features.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.n_features() {
            return Err(ModelError::FeatureWidth {
                expected: self.n_features(),
                found: features.len(),
            });
        }
        Ok(softmax(&self.margins(features)))
    }

    fn feature_importances(&self) -> Vec<f64> {
        self.feature_importances.clone()
    }

    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            model_type: "Gradient Boosted Trees Classifier".to_string(),
            model_architecture: "Classical ML (tree-based gradient boosting)".to_string(),
            is_classical: true,
        }
    }
}

/// Numerically stable softmax.
pub fn softmax(margins: &[f64]) -> Vec<f64> {
    let max = margins.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = margins.iter().map(|m| (m - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn mean_log_loss(margins: &[Vec<f64>], labels: &[usize]) -> f64 {
    if margins.is_empty() {
        return 0.0;
    }
    let total: f64 = margins
        .iter()
        .zip(labels)
        .map(|(m, &y)| -softmax(m)[y].max(1e-15).ln())
        .sum();
    total / margins.len() as f64
}

fn average_gain_importance(rounds: &[Vec<TreeNode>], n_features: usize) -> Vec<f64> {
    let mut gains = vec![0.0; n_features];
    let mut counts = vec![0usize; n_features];
    for tree in rounds.iter().flatten() {
        tree.accumulate_gain(&mut gains, &mut counts);
    }
    let averages: Vec<f64> = gains
        .iter()
        .zip(&counts)
        .map(|(g, &c)| if c == 0 { 0.0 } else { g / c as f64 })
        .collect();
    let total: f64 = averages.iter().sum();
    if total <= 0.0 {
        return vec![0.0; n_features];
    }
    averages.into_iter().map(|a| a / total).collect()
}
