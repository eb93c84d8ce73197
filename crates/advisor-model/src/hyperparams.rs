//! # Fixed Hyperparameters
//!
//! The training constants are not tunable through the pipeline. They are
//! recorded verbatim in every Metadata Record so a reviewer can see exactly
//! how the model was fitted.
//!
//! | Parameter | Value |
//! |---|---|
//! | objective | `multi:softprob` |
//! | max depth | 6 |
//! | learning rate | 0.1 |
//! | estimators (rounds) | 100 |
//! | random state | 42 |
//! | L2 leaf regularization | 1.0 |
//! | min child hessian | 1.0 |
//!
//! The exact greedy fit uses every row and every column on every round, so
//! `random_state` does not influence the ensemble; it is kept for provenance.

use serde::{Deserialize, Serialize};

/// Seed for the stratified train/test split.
pub const SPLIT_SEED: u64 = 42;

/// Share of each class held out for evaluation.
pub const TEST_FRACTION: f64 = 0.2;

/// Training constants for the tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub objective: String,
    pub max_depth: usize,
    pub learning_rate: f64,
    pub n_estimators: usize,
    pub random_state: u64,
    pub reg_lambda: f64,
    pub min_child_weight: f64,
    pub eval_metric: String,
}

impl Hyperparameters {
    /// The constants every production training run uses.
    pub fn fixed() -> Self {
        Self {
            objective: "multi:softprob".to_string(),
            max_depth: 6,
            learning_rate: 0.1,
            n_estimators: 100,
            random_state: 42,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            eval_metric: "mlogloss".to_string(),
        }
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self::fixed()
    }
}
