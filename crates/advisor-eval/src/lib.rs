//! # advisor-eval — Evaluation Engine
//!
//! Pure functions from `(model, held-out data)` to metrics. Nothing here
//! mutates the model or draws random numbers; each row's prediction depends
//! only on that row.
//!
//! ## Outputs
//!
//! | Group | Contents |
//! |---|---|
//! | [`ClassificationMetrics`] | accuracy, per-class P/R/F1/support, macro and weighted averages, confusion matrix, log-loss |
//! | [`ConfidenceMetrics`] | max-probability statistics and fixed-edge bin accuracy |
//! | [`UncertaintyMetrics`] | mean entropy, mean normalized entropy, count per level |
//!
//! Confusion matrix rows are actual classes and columns are predicted
//! classes, both in the target codec's class order.

pub mod classification;
pub mod confidence;
pub mod engine;
pub mod error;
pub mod uncertainty;

pub use classification::{
    classification_metrics, confusion_matrix, log_loss, AveragedMetrics, ClassMetrics,
    ClassificationMetrics,
};
pub use confidence::{
    bin_index, confidence_metrics, ConfidenceBin, ConfidenceMetrics, CONFIDENCE_BIN_EDGES,
};
pub use engine::{evaluate, predict_rows, Metrics, Predictions};
pub use error::EvalError;
pub use uncertainty::{uncertainty_metrics, UncertaintyMetrics};
